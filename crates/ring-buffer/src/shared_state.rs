//! Double-Buffered Shared State
//!
//! Latest-only handoff: the producer overwrites a back buffer, the consumer
//! swaps it to the front when it reads. Snapshots written between two reads
//! are dropped.

use crate::error::Shutdown;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

struct Buffers<T> {
    /// Consumer reads from this
    front: T,
    /// Producer writes to this
    back: T,
    has_new_data: bool,
    stopped: bool,
}

/// Single-slot, double-buffered state shared between one writer and readers
pub struct SharedState<T> {
    buffers: Mutex<Buffers<T>>,
    new_data: Condvar,
    stop_flag: AtomicBool,
}

impl<T: Clone> SharedState<T> {
    /// Create shared state with both buffers set to `initial`
    pub fn new(initial: T) -> Self {
        Self {
            buffers: Mutex::new(Buffers {
                front: initial.clone(),
                back: initial,
                has_new_data: false,
                stopped: false,
            }),
            new_data: Condvar::new(),
            stop_flag: AtomicBool::new(false),
        }
    }

    /// Publish a full snapshot, replacing any unread one
    pub fn write_state(&self, state: T) -> Result<(), Shutdown> {
        let mut buffers = self.buffers.lock();
        if buffers.stopped {
            return Err(Shutdown);
        }
        buffers.back = state;
        buffers.has_new_data = true;
        drop(buffers);

        self.new_data.notify_one();
        Ok(())
    }

    /// Block until a new snapshot is available or stop is signalled.
    ///
    /// On stop with nothing new, the last front buffer is returned unchanged.
    pub fn read_state(&self) -> T {
        let mut buffers = self.buffers.lock();
        Self::wait_for_data(&self.new_data, &mut buffers);
        if buffers.has_new_data {
            Self::swap(&mut buffers);
        }
        buffers.front.clone()
    }

    /// Read without blocking.
    ///
    /// `Some` means a swap happened and carries the new front buffer. `None`
    /// means nothing new, or the lock was momentarily held elsewhere.
    pub fn try_read_state(&self) -> Option<T> {
        let mut buffers = self.buffers.try_lock()?;
        if !buffers.has_new_data {
            return None;
        }
        Self::swap(&mut buffers);
        Some(buffers.front.clone())
    }

    /// Like `read_state`, but reports `Shutdown` instead of repeating a stale
    /// front buffer once stopped.
    pub(crate) fn read_fresh(&self) -> Result<T, Shutdown> {
        let mut buffers = self.buffers.lock();
        Self::wait_for_data(&self.new_data, &mut buffers);
        if !buffers.has_new_data {
            return Err(Shutdown);
        }
        Self::swap(&mut buffers);
        Ok(buffers.front.clone())
    }

    fn wait_for_data(new_data: &Condvar, buffers: &mut MutexGuard<'_, Buffers<T>>) {
        while !buffers.has_new_data && !buffers.stopped {
            new_data.wait(buffers);
        }
    }

    fn swap(buffers: &mut Buffers<T>) {
        let Buffers { front, back, .. } = buffers;
        std::mem::swap(front, back);
        buffers.has_new_data = false;
    }
}

impl<T> SharedState<T> {
    /// Signal every reader to stop. Idempotent.
    pub fn signal_stop(&self) {
        let mut buffers = self.buffers.lock();
        if buffers.stopped {
            return;
        }
        buffers.stopped = true;
        self.stop_flag.store(true, Ordering::Release);
        drop(buffers);

        info!("Shared state stop signalled");
        self.new_data.notify_all();
    }

    /// Check whether stop has been signalled
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }
}
