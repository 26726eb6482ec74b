//! Full-field snapshot for the latest-only transport

use crate::TelemetryFrame;

/// Every car's frame for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceSnapshot {
    /// Tick that produced this snapshot
    pub tick: u64,
    /// Frames in driver-id order
    pub frames: Vec<TelemetryFrame>,
}

impl RaceSnapshot {
    /// Build a snapshot from one tick's frames
    pub fn from_frames(tick: u64, frames: &[TelemetryFrame]) -> Self {
        Self {
            tick,
            frames: frames.to_vec(),
        }
    }

    /// Race time of the snapshot in milliseconds
    pub fn timestamp_ms(&self) -> u32 {
        self.frames.first().map(|f| f.timestamp_ms).unwrap_or(0)
    }
}
