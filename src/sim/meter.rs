//! Water meter and plant state
//!
//! Pure derivations from `(water_in_pot, total_water_needed)`; nothing here
//! touches the world.

use serde::{Deserialize, Serialize};

use super::body::PlantState;
use crate::consts::{OVERWATER_LIMIT, WATER_GOAL_MAX, WATER_GOAL_MIN};

/// Meter colour while the plant is fine or thirsty
pub const METER_COLOR_WATER: &str = "#1e90ff";
/// Meter colour once the soil is waterlogged
pub const METER_COLOR_MUD: &str = "#8B4513";

/// Percentage thresholds used for the meter and for judging a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalBand {
    /// Lowest winning percentage (inclusive); also where the plant perks up
    pub min: f64,
    /// Highest winning percentage (inclusive)
    pub max: f64,
    /// Above this the plant drowns
    pub overwater: f64,
}

impl Default for GoalBand {
    fn default() -> Self {
        Self {
            min: WATER_GOAL_MIN,
            max: WATER_GOAL_MAX,
            overwater: OVERWATER_LIMIT,
        }
    }
}

impl GoalBand {
    /// Inclusive on both ends
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.min && percentage <= self.max
    }

    /// Plant sprite for an (unclamped or clamped) percentage
    pub fn plant_state(&self, percentage: f64) -> PlantState {
        if percentage > self.overwater {
            PlantState::Drowning
        } else if percentage >= self.min {
            PlantState::Healthy
        } else {
            PlantState::Wilting
        }
    }
}

/// Unclamped water percentage. Multiplies first so whole-number results stay exact.
pub fn water_percentage(water_in_pot: u32, total_water_needed: u32) -> f64 {
    if total_water_needed == 0 {
        return 0.0;
    }
    water_in_pot as f64 * 100.0 / total_water_needed as f64
}

/// What the meter and plant show right now
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Fill level, clamped to [0, 100]
    pub percentage: f64,
    pub plant: PlantState,
}

impl MeterReading {
    pub fn new(water_in_pot: u32, total_water_needed: u32, band: &GoalBand) -> Self {
        let percentage = water_percentage(water_in_pot, total_water_needed).clamp(0.0, 100.0);
        Self {
            percentage,
            plant: band.plant_state(percentage),
        }
    }

    /// CSS colour for the meter bar
    pub fn color(&self) -> &'static str {
        match self.plant {
            PlantState::Drowning => METER_COLOR_MUD,
            PlantState::Healthy | PlantState::Wilting => METER_COLOR_WATER,
        }
    }
}

impl Default for MeterReading {
    fn default() -> Self {
        Self {
            percentage: 0.0,
            plant: PlantState::Wilting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_state_boundaries() {
        let band = GoalBand::default();
        assert_eq!(band.plant_state(34.999), PlantState::Wilting);
        assert_eq!(band.plant_state(35.0), PlantState::Healthy);
        assert_eq!(band.plant_state(65.0), PlantState::Healthy);
        assert_eq!(band.plant_state(90.0), PlantState::Healthy);
        assert_eq!(band.plant_state(90.001), PlantState::Drowning);
        assert_eq!(band.plant_state(0.0), PlantState::Wilting);
    }

    #[test]
    fn test_goal_band_inclusive() {
        let band = GoalBand::default();
        assert!(band.contains(35.0));
        assert!(band.contains(65.0));
        assert!(!band.contains(34.5));
        assert!(!band.contains(65.5));
    }

    #[test]
    fn test_percentage_exact_for_whole_numbers() {
        assert_eq!(water_percentage(70, 200), 35.0);
        assert_eq!(water_percentage(69, 200), 34.5);
        assert_eq!(water_percentage(131, 200), 65.5);
        assert_eq!(water_percentage(400, 200), 200.0);
        assert_eq!(water_percentage(5, 0), 0.0);
    }

    #[test]
    fn test_reading_clamps_display() {
        let band = GoalBand::default();
        let over = MeterReading::new(300, 200, &band);
        assert_eq!(over.percentage, 100.0);
        assert_eq!(over.plant, PlantState::Drowning);
        assert_eq!(over.color(), METER_COLOR_MUD);

        let empty = MeterReading::new(0, 200, &band);
        assert_eq!(empty, MeterReading::default());
        assert_eq!(empty.color(), METER_COLOR_WATER);
    }

    #[test]
    fn test_reading_tracks_count() {
        let band = GoalBand::default();
        assert_eq!(MeterReading::new(69, 200, &band).plant, PlantState::Wilting);
        assert_eq!(MeterReading::new(70, 200, &band).plant, PlantState::Healthy);
        assert_eq!(MeterReading::new(180, 200, &band).plant, PlantState::Healthy);
        assert_eq!(MeterReading::new(181, 200, &band).plant, PlantState::Drowning);
        assert_eq!(MeterReading::new(181, 200, &band).color(), METER_COLOR_MUD);
    }
}
