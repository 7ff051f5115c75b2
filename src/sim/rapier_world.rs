//! `PhysicsWorld` backed by rapier2d
//!
//! Positions cross this boundary in pixels (y down) and are scaled to metres
//! inside rapier so the solver tolerances stay meaningful.

use std::collections::BTreeMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use super::body::{BodyDesc, BodyId, BodyKind, BodyRole, Shape, Visual};
use super::world::{BodySnapshot, CollisionPair, PhysicsWorld};
use crate::consts::{GRAVITY, PIXELS_PER_METER};

#[inline]
fn to_meters(v: f32) -> Real {
    v / PIXELS_PER_METER
}

#[inline]
fn to_pixels(v: Real) -> f32 {
    v * PIXELS_PER_METER
}

/// Collects collision starts during a step.
/// rapier requires `Send + Sync` event handlers, hence the mutex.
#[derive(Default)]
struct CollisionRecorder {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl CollisionRecorder {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut started = self.started.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *started)
    }
}

impl EventHandler for CollisionRecorder {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            let mut started = self.started.lock().unwrap_or_else(|e| e.into_inner());
            started.push((a, b));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Bookkeeping for one body we created
#[derive(Debug, Clone)]
struct Entry {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    role: BodyRole,
    shape: Shape,
    visual: Option<Visual>,
}

/// rapier2d simulation plus the id ↔ handle mapping
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    recorder: CollisionRecorder,
    /// Sorted by id for deterministic iteration
    entries: BTreeMap<BodyId, Entry>,
    /// Never reset, so ids from a cleared world are never reused
    next_id: u32,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, to_meters(GRAVITY)],
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            recorder: CollisionRecorder::default(),
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Current centre of a body in pixels
    #[cfg(test)]
    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        let entry = self.entries.get(&id)?;
        let body = self.bodies.get(entry.body)?;
        let t = body.translation();
        Some(Vec2::new(to_pixels(t.x), to_pixels(t.y)))
    }

    /// Map a collider from an event back to a live body id
    fn id_of(&self, collider: ColliderHandle) -> Option<BodyId> {
        let id = BodyId(self.colliders.get(collider)?.user_data as u32);
        self.entries.contains_key(&id).then_some(id)
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().ccd_enabled(true),
        };
        let rigid_body = builder
            .translation(vector![to_meters(desc.position.x), to_meters(desc.position.y)])
            .user_data(id.0 as u128)
            .build();
        let body = self.bodies.insert(rigid_body);

        let shape = match desc.shape {
            Shape::Rect { width, height } => {
                ColliderBuilder::cuboid(to_meters(width / 2.0), to_meters(height / 2.0))
            }
            Shape::Circle { radius } => ColliderBuilder::ball(to_meters(radius)),
        };
        let mut collider = shape
            .restitution(desc.material.restitution)
            .friction(desc.material.friction)
            .density(desc.material.density)
            .sensor(desc.sensor)
            .user_data(id.0 as u128);
        if desc.events {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        let collider = self
            .colliders
            .insert_with_parent(collider.build(), body, &mut self.bodies);

        self.entries.insert(
            id,
            Entry {
                body,
                collider,
                role: desc.role,
                shape: desc.shape,
                visual: desc.visual,
            },
        );
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        self.bodies.remove(
            entry.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    fn clear(&mut self) {
        self.islands = IslandManager::new();
        self.broad_phase = BroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd = CCDSolver::new();
        self.recorder.drain();
        self.entries.clear();
    }

    fn contains(&self, id: BodyId) -> bool {
        self.entries.contains_key(&id)
    }

    fn role(&self, id: BodyId) -> Option<BodyRole> {
        self.entries.get(&id).map(|e| e.role)
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }

    fn set_visual(&mut self, id: BodyId, visual: Visual) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.visual = Some(visual);
        }
    }

    fn query_point(&self, point: Vec2, candidates: &[BodyId]) -> Vec<BodyId> {
        let pt = point![to_meters(point.x), to_meters(point.y)];
        candidates
            .iter()
            .copied()
            .filter(|id| {
                self.entries
                    .get(id)
                    .and_then(|e| self.colliders.get(e.collider))
                    .is_some_and(|c| c.shape().contains_point(c.position(), &pt))
            })
            .collect()
    }

    fn step(&mut self, dt: f32) -> Vec<CollisionPair> {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.recorder,
        );

        self.recorder
            .drain()
            .into_iter()
            .filter_map(|(a, b)| Some(CollisionPair::new(self.id_of(a)?, self.id_of(b)?)))
            .collect()
    }

    fn snapshot(&self) -> Vec<BodySnapshot> {
        self.entries
            .iter()
            .filter_map(|(&id, entry)| {
                let body = self.bodies.get(entry.body)?;
                let t = body.translation();
                Some(BodySnapshot {
                    id,
                    role: entry.role,
                    shape: entry.shape,
                    position: Vec2::new(to_pixels(t.x), to_pixels(t.y)),
                    angle: body.rotation().angle(),
                    visual: entry.visual,
                })
            })
            .collect()
    }
}
