//! Configuration errors
//!
//! Gameplay itself has no failure modes; only loading tuning data can go wrong.

/// Errors raised while parsing or validating [`crate::Settings`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("total water needed must be at least 1")]
    ZeroWaterNeeded,

    #[error("goal band [{min}, {max}] must satisfy 0 <= min <= max <= overwater limit ({overwater})")]
    InvalidGoalBand { min: f64, max: f64, overwater: f64 },

    #[error("{name} must be positive, got {value} ms")]
    NonPositiveDuration { name: &'static str, value: f64 },
}
