//! Bounded Telemetry Transports
//!
//! Two ways to hand telemetry from a periodic producer to a consumer
//! running at its own pace:
//! - [`RingBuffer`]: fixed-capacity blocking queue, keeps every record
//! - [`SharedState`]: double-buffered single slot, keeps only the latest
//!
//! Both implement [`Transport`], so callers pick one at composition time.

mod buffer;
mod error;
mod shared_state;
mod transport;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
pub use error::{BufferError, Shutdown};
pub use shared_state::SharedState;
pub use transport::{LatestOnlyTransport, QueuedTransport, Transport};
