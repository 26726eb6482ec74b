//! Race Telemetry Records
//!
//! This crate defines the fixed-layout per-car telemetry frame streamed
//! from the race engine to the UI, the static driver roster, and the
//! adapters that move frames over either transport from `ring-buffer`.

mod frame;
mod roster;
mod snapshot;
mod transport;

pub use frame::{TelemetryFrame, UNSET_DRIVER_ID};
pub use roster::{DriverInfo, DRIVER_ROSTER};
pub use snapshot::RaceSnapshot;
pub use transport::{FrameSink, FrameSource};

/// Maximum field size (and roster size)
pub const NUM_DRIVERS: usize = 20;

/// Lap length in metres
pub const TRACK_LENGTH: f32 = 5000.0;

/// Timing sectors per lap
pub const SECTOR_COUNT: usize = 3;

/// Status flag bits carried in [`TelemetryFrame::flags`]
pub mod flags {
    /// Car is stationary in the pit lane
    pub const IN_PITS: u8 = 0x01;
    /// Car is serving a penalty
    pub const PENALTY: u8 = 0x02;
    /// Car has retired (did not finish)
    pub const DNF: u8 = 0x04;
    /// Safety car period active
    pub const SAFETY_CAR: u8 = 0x08;
}
