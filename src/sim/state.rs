//! Game state and round outcome types
//!
//! Everything a round mutates lives in [`GameSession`]; a level load replaces
//! it wholesale.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::meter::{GoalBand, MeterReading};
use super::timer::TimerId;

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoseReason {
    /// Above the goal band
    OverIrrigated,
    /// Below the goal band
    UnderWatered,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose(LoseReason),
}

impl Outcome {
    /// Judge an unclamped water percentage
    pub fn judge(percentage: f64, band: &GoalBand) -> Self {
        if band.contains(percentage) {
            Outcome::Win
        } else if percentage > band.max {
            Outcome::Lose(LoseReason::OverIrrigated)
        } else {
            Outcome::Lose(LoseReason::UnderWatered)
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }

    /// Text for the end-of-round panel
    pub fn message(&self) -> EndMessage {
        match self {
            Outcome::Win => EndMessage {
                title: "Success!",
                text: "Perfect irrigation! You gave the plant just what it needed. \
                       This conserves water and keeps the soil healthy.",
            },
            Outcome::Lose(LoseReason::OverIrrigated) => EndMessage {
                title: "Try Again!",
                text: "Over-irrigated! Too much water washes away vital nutrients \
                       and can harm plant roots. Precision is key!",
            },
            Outcome::Lose(LoseReason::UnderWatered) => EndMessage {
                title: "Try Again!",
                text: "Not enough water! The plant is still thirsty. \
                       Try to guide the water more efficiently.",
            },
        }
    }
}

/// Title/body pair shown when a round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndMessage {
    pub title: &'static str,
    pub text: &'static str,
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level laid out, player may dig, faucet off
    #[default]
    Loading,
    /// Faucet running
    Flowing,
    /// Faucet off, water still settling before judgement
    Settling,
    /// Round judged
    Ended(Outcome),
}

impl GamePhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, GamePhase::Ended(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GamePhase::Ended(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Mutable state of one round
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Particles that reached the pot (never decreases within a session)
    pub water_in_pot: u32,
    /// Particles that fill the meter to 100%
    pub total_water_needed: u32,
    /// Set by starting the flow, cleared when the round ends
    pub flowing: bool,
    /// Pointer held down for digging
    pub digging: bool,
    /// Whether the start control accepts a press
    pub start_enabled: bool,
    /// Diggable soil still in the world, row-major
    pub dirt: Vec<BodyId>,
    /// Water particles still in the world
    pub water: BTreeSet<BodyId>,
    /// Particles spawned this round
    pub particles_emitted: u32,
    /// Handle of the repeating emission task while the faucet runs
    pub emission: Option<TimerId>,
    pub meter: MeterReading,
    pub message: Option<EndMessage>,
}

impl GameSession {
    /// Fresh session for a newly loaded level
    pub fn new(total_water_needed: u32, dirt: Vec<BodyId>) -> Self {
        Self {
            phase: GamePhase::Loading,
            water_in_pot: 0,
            total_water_needed,
            flowing: false,
            digging: false,
            start_enabled: true,
            dirt,
            water: BTreeSet::new(),
            particles_emitted: 0,
            emission: None,
            meter: MeterReading::default(),
            message: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase.is_ended()
    }
}
