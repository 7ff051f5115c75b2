//! Fixed timestep tick
//!
//! Applies buffered player input, runs due timer tasks, steps the physics
//! world and scores the step's collisions, in that order.

use glam::Vec2;

use super::game::Game;
use super::world::PhysicsWorld;

/// Input collected between two ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start button
    pub start_flow: bool,
    /// Reset button
    pub reset: bool,
    /// Next-level button
    pub next_level: bool,
    /// Pointer pressed on the canvas
    pub pointer_down: bool,
    /// Pointer released
    pub pointer_up: bool,
    /// Pointer positions (canvas pixels) in arrival order
    pub pointer_moves: Vec<Vec2>,
}

impl TickInput {
    /// Forget everything that has been applied
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<W: PhysicsWorld> Game<W> {
    /// Advance the game by one fixed timestep of `dt` seconds
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if input.reset {
            self.reset();
        } else if input.next_level {
            self.next_level();
        }

        if input.start_flow {
            self.start_flow();
        }

        if input.pointer_down {
            self.pointer_down();
        }
        for &point in &input.pointer_moves {
            self.pointer_move(point);
        }
        if input.pointer_up {
            self.pointer_up();
        }

        self.scheduler.advance(dt as f64 * 1000.0);
        while let Some(fired) = self.scheduler.pop_due() {
            self.run_timer(fired);
        }

        let pairs = self.world.step(dt);
        self.on_collision_start(&pairs);
    }
}
