//! Irrigate - dig through soil to water a plant
//!
//! Core modules:
//! - `sim`: Gameplay state machine (layout, digging, water flow, scoring, timers)
//! - `renderer`: Canvas 2D drawing of the physics world (wasm32 only)
//! - `settings`: Data-driven game balance and display preferences
//! - `error`: Configuration errors

pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the browser frame cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels, y grows downward)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Dirt grid pitch and the inclusive row band it fills
    pub const DIRT_BLOCK_SIZE: f32 = 20.0;
    pub const DIRT_FIRST_ROW: u32 = 6;
    pub const DIRT_LAST_ROW: u32 = 24;

    /// Water particle radius
    pub const WATER_PARTICLE_SIZE: f32 = 5.0;
    pub const WATER_RESTITUTION: f32 = 0.2;
    pub const WATER_FRICTION: f32 = 0.1;
    pub const WATER_DENSITY: f32 = 0.002;

    /// Where particles leave the faucet
    pub const FAUCET_SPOUT: (f32, f32) = (100.0, 80.0);

    /// Goal band and overwatering threshold (percent)
    pub const WATER_GOAL_MIN: f64 = 35.0;
    pub const WATER_GOAL_MAX: f64 = 65.0;
    pub const OVERWATER_LIMIT: f64 = 90.0;

    /// Particles needed to fill the meter to 100%
    pub const TOTAL_WATER_NEEDED: u32 = 200;

    /// Flow timings (milliseconds)
    pub const EMIT_INTERVAL_MS: f64 = 100.0;
    pub const FLOW_DURATION_MS: f64 = 5000.0;
    pub const SETTLE_DELAY_MS: f64 = 2000.0;

    /// Physics world scale and gravity
    pub const PIXELS_PER_METER: f32 = 50.0;
    pub const GRAVITY: f32 = 1000.0; // pixels/s²
}
