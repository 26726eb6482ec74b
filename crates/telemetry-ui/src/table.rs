//! Latest-per-car table

use race_telemetry::TelemetryFrame;
use tracing::warn;

/// Most recent frame for every car, indexed by driver id.
///
/// Entries start out unset (`UNSET_DRIVER_ID`) so a car that has never
/// reported can be told apart from one that has.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestTable {
    entries: Vec<TelemetryFrame>,
}

impl LatestTable {
    /// Create a table for `drivers` cars, all unset
    pub fn new(drivers: usize) -> Self {
        Self {
            entries: vec![TelemetryFrame::unset(); drivers],
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the entry for the frame's driver.
    ///
    /// Returns false (and drops the frame) when the id is out of range.
    pub fn update(&mut self, frame: TelemetryFrame) -> bool {
        match self.entries.get_mut(frame.driver_id as usize) {
            Some(entry) => {
                *entry = frame;
                true
            }
            None => {
                warn!(
                    "Dropping frame for driver {} (table holds {})",
                    frame.driver_id,
                    self.entries.len()
                );
                false
            }
        }
    }

    /// Latest frame for a driver, None if it never reported
    pub fn get(&self, driver_id: usize) -> Option<&TelemetryFrame> {
        self.entries.get(driver_id).filter(|f| f.is_set())
    }

    /// Cars that have reported at least once
    pub fn reported(&self) -> usize {
        self.entries.iter().filter(|f| f.is_set()).count()
    }

    /// Best-placed car among the reported ones
    pub fn leader(&self) -> Option<&TelemetryFrame> {
        self.entries
            .iter()
            .filter(|f| f.is_set())
            .min_by_key(|f| (f.position, f.driver_id))
    }

    /// Worst-placed car among the reported ones
    pub fn last_place(&self) -> Option<&TelemetryFrame> {
        self.entries
            .iter()
            .filter(|f| f.is_set())
            .max_by_key(|f| (f.position, f.driver_id))
    }

    /// Reported cars in race order
    pub fn standings(&self) -> Vec<&TelemetryFrame> {
        let mut standings: Vec<_> = self.entries.iter().filter(|f| f.is_set()).collect();
        standings.sort_by_key(|f| (f.position, f.driver_id));
        standings
    }
}
