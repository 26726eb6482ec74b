//! Race Engine (Producer)
//!
//! Advances a seeded race simulation once per tick and publishes one
//! telemetry frame per car, in driver-id order:
//! - Team car profiles and individual driver profiles
//! - Tire wear and pit stops
//! - Retirements and safety car periods
//! - Sector and lap timing

pub mod engine;
pub mod physics;
pub mod profiles;

pub use engine::{ProducerOutcome, ProducerReport, RaceEngine};
pub use physics::{CarState, DT, SIMULATION_HZ, TICK_MS};
pub use profiles::{CarProfile, DriverProfile};

use race_telemetry::NUM_DRIVERS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Race needs at least one driver")]
    NoDrivers,

    #[error("Field of {0} drivers exceeds the roster of {max}", max = NUM_DRIVERS)]
    TooManyDrivers(usize),

    #[error("Race needs at least one lap")]
    NoLaps,
}

/// Race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for deterministic replay
    pub seed: u64,
    /// Laps the leader must complete
    pub total_laps: u16,
    /// Cars on the grid (first N of the roster)
    pub drivers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_laps: 5,
            drivers: NUM_DRIVERS,
        }
    }
}

impl EngineConfig {
    /// Check the configuration before any thread starts
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.drivers == 0 {
            return Err(EngineError::NoDrivers);
        }
        if self.drivers > NUM_DRIVERS {
            return Err(EngineError::TooManyDrivers(self.drivers));
        }
        if self.total_laps == 0 {
            return Err(EngineError::NoLaps);
        }
        Ok(())
    }
}
