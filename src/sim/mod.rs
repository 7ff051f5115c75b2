//! Gameplay simulation module
//!
//! All gameplay logic lives here. The physics engine sits behind
//! [`PhysicsWorld`]; everything else is deterministic:
//! - Fixed timestep only
//! - Timers on the simulation clock, never wall time
//! - Stable iteration order (by body id)
//! - No rendering or platform dependencies

pub mod body;
pub mod game;
pub mod layout;
pub mod meter;
pub mod rapier_world;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

pub use body::{BodyDesc, BodyId, BodyKind, BodyRole, Material, PlantState, Shape, Visual};
pub use game::Game;
pub use layout::{LevelBodies, build_level};
pub use meter::{GoalBand, MeterReading, water_percentage};
pub use rapier_world::RapierWorld;
pub use state::{EndMessage, GamePhase, GameSession, LoseReason, Outcome};
pub use tick::TickInput;
pub use timer::{Scheduler, TimerKind};
pub use world::{BodySnapshot, CollisionPair, PhysicsWorld};
