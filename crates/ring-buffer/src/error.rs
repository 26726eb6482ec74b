//! Ring Buffer Error Types

use thiserror::Error;

/// The transport has been shut down.
///
/// Not a failure: producers and consumers treat it as the signal to stop
/// cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transport has been shut down")]
pub struct Shutdown;

/// Errors raised while constructing a buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// One slot is always kept free, so fewer than two slots hold nothing
    #[error("ring buffer capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),
}
