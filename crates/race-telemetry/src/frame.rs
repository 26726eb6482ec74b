//! Telemetry Frame Layout
//!
//! One frame per car per tick. The layout is fixed so frames can be copied
//! by value into pre-allocated ring buffer slots:
//!
//! | Offset | Field           | Type       |
//! |-------:|-----------------|------------|
//! |      0 | `timestamp_ms`  | `u32`      |
//! |      4 | `driver_id`     | `u8`       |
//! |      5 | `position`      | `u8`       |
//! |      6 | `lap`           | `u16`      |
//! |      8 | `sector`        | `u8`       |
//! |      9 | `flags`         | `u8`       |
//! |     10 | reserved        | `[u8; 2]`  |
//! |     12 | `speed`         | `f32`      |
//! |     16 | `distance`      | `f32`      |
//! |     20 | `throttle`      | `f32`      |
//! |     24 | `tire_wear`     | `f32`      |
//! |     28 | `sector_times`  | `[f32; 3]` |
//! |     40 | `last_lap_time` | `f32`      |
//! |     44 | `gap_to_leader` | `f32`      |
//!
//! Bytes 48..64 are tail padding from the 64-byte alignment, so a frame
//! occupies exactly one cache line.

use crate::{flags, SECTOR_COUNT};
use serde::Serialize;

/// Driver id marking a latest-table entry that was never written
pub const UNSET_DRIVER_ID: u8 = 255;

/// Telemetry frame for a single car at one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[repr(C, align(64))]
pub struct TelemetryFrame {
    /// Race time in milliseconds
    pub timestamp_ms: u32,
    /// Car index, 0..N-1, stable for the run
    pub driver_id: u8,
    /// Race position, 1..N
    pub position: u8,
    /// Current lap, starting at 1
    pub lap: u16,
    /// Current sector (0-2)
    pub sector: u8,
    /// Status bits, see [`crate::flags`]
    pub flags: u8,
    #[serde(skip)]
    _reserved: [u8; 2],
    /// Speed (km/h)
    pub speed: f32,
    /// Total distance travelled (m), negative behind the start line
    pub distance: f32,
    /// Throttle (0.0-1.0)
    pub throttle: f32,
    /// Tire wear (0.0-100.0 %)
    pub tire_wear: f32,
    /// Seconds spent in each sector of the current lap
    pub sector_times: [f32; SECTOR_COUNT],
    /// Duration of the previous completed lap (s), 0 before the first
    pub last_lap_time: f32,
    /// Estimated time behind the leader (s)
    pub gap_to_leader: f32,
}

impl TelemetryFrame {
    /// Size of this struct in bytes (one cache line)
    pub const SIZE_BYTES: usize = 64;

    /// Create a new frame for a driver at the given race time
    pub fn new(driver_id: u8, timestamp_ms: u32) -> Self {
        Self {
            driver_id,
            timestamp_ms,
            ..Default::default()
        }
    }

    /// Frame marking a latest-table slot that has never been written
    pub fn unset() -> Self {
        Self::new(UNSET_DRIVER_ID, 0)
    }

    /// Check if this frame carries real data
    pub fn is_set(&self) -> bool {
        self.driver_id != UNSET_DRIVER_ID
    }

    /// Check a status flag
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Check if the car is in the pits
    pub fn in_pits(&self) -> bool {
        self.has_flag(flags::IN_PITS)
    }

    /// Check if the car has retired
    pub fn is_retired(&self) -> bool {
        self.has_flag(flags::DNF)
    }

    /// Race time in seconds
    pub fn race_time_secs(&self) -> f32 {
        self.timestamp_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoffset::offset_of;
    use std::mem::{align_of, size_of};

    #[test]
    fn test_frame_is_one_cache_line() {
        assert_eq!(size_of::<TelemetryFrame>(), TelemetryFrame::SIZE_BYTES);
        assert_eq!(align_of::<TelemetryFrame>(), 64);
    }

    #[test]
    fn test_frame_field_offsets() {
        assert_eq!(offset_of!(TelemetryFrame, timestamp_ms), 0);
        assert_eq!(offset_of!(TelemetryFrame, driver_id), 4);
        assert_eq!(offset_of!(TelemetryFrame, position), 5);
        assert_eq!(offset_of!(TelemetryFrame, lap), 6);
        assert_eq!(offset_of!(TelemetryFrame, sector), 8);
        assert_eq!(offset_of!(TelemetryFrame, flags), 9);
        assert_eq!(offset_of!(TelemetryFrame, speed), 12);
        assert_eq!(offset_of!(TelemetryFrame, distance), 16);
        assert_eq!(offset_of!(TelemetryFrame, throttle), 20);
        assert_eq!(offset_of!(TelemetryFrame, tire_wear), 24);
        assert_eq!(offset_of!(TelemetryFrame, sector_times), 28);
        assert_eq!(offset_of!(TelemetryFrame, last_lap_time), 40);
        assert_eq!(offset_of!(TelemetryFrame, gap_to_leader), 44);
    }

    #[test]
    fn test_unset_marker() {
        let frame = TelemetryFrame::unset();
        assert!(!frame.is_set());
        assert!(TelemetryFrame::new(0, 20).is_set());
    }

    #[test]
    fn test_flags() {
        let mut frame = TelemetryFrame::new(3, 0);
        assert!(!frame.in_pits());

        frame.flags = flags::IN_PITS | flags::SAFETY_CAR;
        assert!(frame.in_pits());
        assert!(frame.has_flag(flags::SAFETY_CAR));
        assert!(!frame.is_retired());
    }

    #[test]
    fn test_serializes_without_padding() {
        let mut frame = TelemetryFrame::new(1, 1500);
        frame.position = 2;
        let json = serde_json::to_value(frame).unwrap();

        assert_eq!(json["driver_id"], 1);
        assert_eq!(json["timestamp_ms"], 1500);
        assert!(json.get("_reserved").is_none());
    }
}
