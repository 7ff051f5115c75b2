//! Scripted physics world for tests
//!
//! Bodies never move. Collision starts are queued by the test and handed
//! out by the next `step`.

use std::collections::BTreeMap;

use glam::Vec2;

use super::body::{BodyDesc, BodyId, BodyRole, Visual};
use super::world::{BodySnapshot, CollisionPair, PhysicsWorld};

#[derive(Debug, Default)]
pub struct FakeWorld {
    bodies: BTreeMap<BodyId, BodyDesc>,
    queued: Vec<CollisionPair>,
    next_id: u32,
    pub steps: u32,
    pub removed: Vec<BodyId>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Report `a`/`b` as starting to collide on the next step
    pub fn queue_collision(&mut self, a: BodyId, b: BodyId) {
        self.queued.push(CollisionPair::new(a, b));
    }

    pub fn desc(&self, id: BodyId) -> Option<&BodyDesc> {
        self.bodies.get(&id)
    }

    pub fn ids_with_role(&self, role: BodyRole) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|(_, d)| d.role == role)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn visual(&self, id: BodyId) -> Option<Visual> {
        self.bodies.get(&id).and_then(|d| d.visual)
    }
}

impl PhysicsWorld for FakeWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, desc);
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let removed = self.bodies.remove(&id).is_some();
        if removed {
            self.removed.push(id);
        }
        removed
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.queued.clear();
    }

    fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn role(&self, id: BodyId) -> Option<BodyRole> {
        self.bodies.get(&id).map(|d| d.role)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn set_visual(&mut self, id: BodyId, visual: Visual) {
        if let Some(desc) = self.bodies.get_mut(&id) {
            desc.visual = Some(visual);
        }
    }

    fn query_point(&self, point: Vec2, candidates: &[BodyId]) -> Vec<BodyId> {
        candidates
            .iter()
            .copied()
            .filter(|id| {
                self.bodies
                    .get(id)
                    .is_some_and(|d| d.shape.contains(d.position, point))
            })
            .collect()
    }

    fn step(&mut self, _dt: f32) -> Vec<CollisionPair> {
        self.steps += 1;
        std::mem::take(&mut self.queued)
    }

    fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|(&id, d)| BodySnapshot {
                id,
                role: d.role,
                shape: d.shape,
                position: d.position,
                angle: 0.0,
                visual: d.visual,
            })
            .collect()
    }
}
