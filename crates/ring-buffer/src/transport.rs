//! Transport Abstraction
//!
//! Producer and consumer loops are written against [`Transport`] so the
//! queued and latest-only handoffs can be swapped at composition time.

use crate::buffer::RingBuffer;
use crate::error::Shutdown;
use crate::shared_state::SharedState;

/// Bounded state transport between one producer and its consumers
pub trait Transport<T>: Send + Sync {
    /// Hand an item to the consumer side
    fn send(&self, item: T) -> Result<(), Shutdown>;

    /// Block until an item is available; `Shutdown` once nothing more will come
    fn receive(&self) -> Result<T, Shutdown>;

    /// Non-blocking receive for callers with their own event loop
    fn try_receive(&self) -> Option<T>;

    /// Request shutdown and wake all blocked parties. Idempotent.
    fn shutdown(&self);

    /// Check whether shutdown has been requested
    fn is_shutdown(&self) -> bool;
}

/// Every item is delivered, in order, with backpressure
pub type QueuedTransport<T> = RingBuffer<T>;

/// Only the most recent item is delivered
pub type LatestOnlyTransport<T> = SharedState<T>;

impl<T: Copy + Default + Send> Transport<T> for RingBuffer<T> {
    fn send(&self, item: T) -> Result<(), Shutdown> {
        self.push(item)
    }

    fn receive(&self) -> Result<T, Shutdown> {
        self.pop()
    }

    fn try_receive(&self) -> Option<T> {
        self.try_pop()
    }

    fn shutdown(&self) {
        RingBuffer::shutdown(self)
    }

    fn is_shutdown(&self) -> bool {
        RingBuffer::is_shutdown(self)
    }
}

impl<T: Clone + Send> Transport<T> for SharedState<T> {
    fn send(&self, item: T) -> Result<(), Shutdown> {
        self.write_state(item)
    }

    fn receive(&self) -> Result<T, Shutdown> {
        self.read_fresh()
    }

    fn try_receive(&self) -> Option<T> {
        self.try_read_state()
    }

    fn shutdown(&self) {
        self.signal_stop()
    }

    fn is_shutdown(&self) -> bool {
        self.is_stopped()
    }
}
