//! Narrow interface to the rigid-body physics engine
//!
//! The game never touches engine types directly. Anything that can add and
//! remove bodies, answer point queries and report collision starts per step
//! can host a round.

use glam::Vec2;

use super::body::{BodyDesc, BodyId, BodyRole, Shape, Visual};

/// Two bodies that started touching (or overlapping, for sensors) during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyId,
    pub b: BodyId,
}

impl CollisionPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }
}

/// Drawing data for one body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub role: BodyRole,
    pub shape: Shape,
    /// Centre position (pixels)
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub visual: Option<Visual>,
}

/// Rigid-body world the game runs in
pub trait PhysicsWorld {
    /// Create a body and add it to the world
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Remove a body. Returns false if it was not in the world.
    fn remove_body(&mut self, id: BodyId) -> bool;

    /// Remove every body
    fn clear(&mut self);

    fn contains(&self, id: BodyId) -> bool;

    /// Role the body was created with, `None` once removed
    fn role(&self, id: BodyId) -> Option<BodyRole>;

    fn body_count(&self) -> usize;

    /// Swap how a body is drawn
    fn set_visual(&mut self, id: BodyId, visual: Visual);

    /// Bodies among `candidates` whose shape contains `point`
    fn query_point(&self, point: Vec2, candidates: &[BodyId]) -> Vec<BodyId>;

    /// Advance the simulation by `dt` seconds, returning the collision starts
    fn step(&mut self, dt: f32) -> Vec<CollisionPair>;

    /// Every body, for drawing
    fn snapshot(&self) -> Vec<BodySnapshot>;
}
