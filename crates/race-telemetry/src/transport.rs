//! Frame Sinks and Sources
//!
//! Adapts the generic [`Transport`] implementations to whole ticks of
//! telemetry. The queued transport streams one frame per slot; the
//! latest-only transport carries one [`RaceSnapshot`] per tick.

use crate::{RaceSnapshot, TelemetryFrame};
use ring_buffer::{RingBuffer, SharedState, Shutdown, Transport};
use std::sync::Arc;

/// Producer side: publishes one tick of frames
pub trait FrameSink: Send + Sync {
    /// Publish every car's frame for `tick`, in driver-id order.
    ///
    /// On `Shutdown` some frames of the tick may already have been
    /// published; the rest are dropped.
    fn publish(&self, tick: u64, frames: &[TelemetryFrame]) -> Result<(), Shutdown>;

    /// Request shutdown of the underlying transport
    fn shutdown(&self);

    /// Check whether shutdown has been requested
    fn is_shutdown(&self) -> bool;
}

/// Consumer side: yields frames as they arrive
pub trait FrameSource: Send + Sync {
    /// Block until at least one frame is available and append it to `out`.
    ///
    /// `Shutdown` means the transport is closed and fully drained.
    fn next_frames(&self, out: &mut Vec<TelemetryFrame>) -> Result<(), Shutdown>;

    /// Frames waiting to be received, when the transport queues them
    fn backlog(&self) -> usize {
        0
    }
}

impl FrameSink for RingBuffer<TelemetryFrame> {
    fn publish(&self, _tick: u64, frames: &[TelemetryFrame]) -> Result<(), Shutdown> {
        for frame in frames {
            Transport::<TelemetryFrame>::send(self, *frame)?;
        }
        Ok(())
    }

    fn shutdown(&self) {
        Transport::<TelemetryFrame>::shutdown(self)
    }

    fn is_shutdown(&self) -> bool {
        Transport::<TelemetryFrame>::is_shutdown(self)
    }
}

impl FrameSource for RingBuffer<TelemetryFrame> {
    fn next_frames(&self, out: &mut Vec<TelemetryFrame>) -> Result<(), Shutdown> {
        out.push(Transport::<TelemetryFrame>::receive(self)?);
        Ok(())
    }

    fn backlog(&self) -> usize {
        self.len()
    }
}

impl FrameSink for SharedState<RaceSnapshot> {
    fn publish(&self, tick: u64, frames: &[TelemetryFrame]) -> Result<(), Shutdown> {
        Transport::<RaceSnapshot>::send(self, RaceSnapshot::from_frames(tick, frames))
    }

    fn shutdown(&self) {
        Transport::<RaceSnapshot>::shutdown(self)
    }

    fn is_shutdown(&self) -> bool {
        Transport::<RaceSnapshot>::is_shutdown(self)
    }
}

impl FrameSource for SharedState<RaceSnapshot> {
    fn next_frames(&self, out: &mut Vec<TelemetryFrame>) -> Result<(), Shutdown> {
        let snapshot = Transport::<RaceSnapshot>::receive(self)?;
        out.extend_from_slice(&snapshot.frames);
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Arc<S> {
    fn publish(&self, tick: u64, frames: &[TelemetryFrame]) -> Result<(), Shutdown> {
        (**self).publish(tick, frames)
    }

    fn shutdown(&self) {
        (**self).shutdown()
    }

    fn is_shutdown(&self) -> bool {
        (**self).is_shutdown()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Arc<S> {
    fn next_frames(&self, out: &mut Vec<TelemetryFrame>) -> Result<(), Shutdown> {
        (**self).next_frames(out)
    }

    fn backlog(&self) -> usize {
        (**self).backlog()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    fn next_frames(&self, out: &mut Vec<TelemetryFrame>) -> Result<(), Shutdown> {
        (**self).next_frames(out)
    }

    fn backlog(&self) -> usize {
        (**self).backlog()
    }
}
