//! Game settings and balance
//!
//! Persisted in LocalStorage on the web; read from a JSON file named by
//! `IRRIGATE_SETTINGS` natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::GoalBand;

/// Gameplay balance numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Particles that fill the meter to 100%
    pub total_water_needed: u32,
    /// Lowest winning percentage (inclusive)
    pub water_goal_min: f64,
    /// Highest winning percentage (inclusive)
    pub water_goal_max: f64,
    /// Above this the plant drowns
    pub overwater_limit: f64,
    /// Time between two particles while flowing
    pub emit_interval_ms: f64,
    /// How long the faucet runs
    pub flow_duration_ms: f64,
    /// Wait after the faucet stops before judging the round
    pub settle_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            total_water_needed: TOTAL_WATER_NEEDED,
            water_goal_min: WATER_GOAL_MIN,
            water_goal_max: WATER_GOAL_MAX,
            overwater_limit: OVERWATER_LIMIT,
            emit_interval_ms: EMIT_INTERVAL_MS,
            flow_duration_ms: FLOW_DURATION_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl Tuning {
    pub fn goal_band(&self) -> GoalBand {
        GoalBand {
            min: self.water_goal_min,
            max: self.water_goal_max,
            overwater: self.overwater_limit,
        }
    }

    /// Reject numbers the state machine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_water_needed == 0 {
            return Err(ConfigError::ZeroWaterNeeded);
        }

        let band_ok = self.water_goal_min >= 0.0
            && self.water_goal_min <= self.water_goal_max
            && self.water_goal_max <= self.overwater_limit;
        if !band_ok {
            return Err(ConfigError::InvalidGoalBand {
                min: self.water_goal_min,
                max: self.water_goal_max,
                overwater: self.overwater_limit,
            });
        }

        for (name, value) in [
            ("emit_interval_ms", self.emit_interval_ms),
            ("flow_duration_ms", self.flow_duration_ms),
            ("settle_delay_ms", self.settle_delay_ms),
        ] {
            // `!(x > 0)` also catches NaN
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balance numbers for every round
    pub tuning: Tuning,
    /// Draw body outlines instead of sprites
    pub wireframes: bool,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "irrigate_settings";

    /// Environment variable naming a settings file (native only)
    pub const ENV_VAR: &'static str = "IRRIGATE_SETTINGS";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `IRRIGATE_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.tuning.validate().is_ok());
        assert_eq!(settings.tuning.total_water_needed, 200);
        assert!(!settings.wireframes);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"tuning": {"total_water_needed": 40}}"#).unwrap();
        assert_eq!(settings.tuning.total_water_needed, 40);
        assert_eq!(settings.tuning.emit_interval_ms, EMIT_INTERVAL_MS);
        assert_eq!(settings.tuning.water_goal_min, WATER_GOAL_MIN);
    }

    #[test]
    fn test_rejects_zero_water_needed() {
        let err = Settings::from_json(r#"{"tuning": {"total_water_needed": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWaterNeeded));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let err = Settings::from_json(r#"{"tuning": {"water_goal_min": 70, "water_goal_max": 60}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGoalBand { .. }));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = Settings::from_json(r#"{"tuning": {"settle_delay_ms": 0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveDuration { name: "settle_delay_ms", .. }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_goal_band_mirrors_tuning() {
        let band = Tuning::default().goal_band();
        assert_eq!(band.min, 35.0);
        assert_eq!(band.max, 65.0);
        assert_eq!(band.overwater, 90.0);
    }
}
