//! Blocking Ring Buffer Implementation

use crate::error::{BufferError, Shutdown};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info};

/// Default buffer capacity (~51 ticks of a 20-car field)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cursor state guarded by the buffer lock
struct Slots<T> {
    /// Pre-allocated storage
    storage: Box<[T]>,
    /// Head position (write cursor)
    head: usize,
    /// Tail position (read cursor)
    tail: usize,
    /// Set once, never cleared
    shutdown: bool,
}

impl<T> Slots<T> {
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    fn is_full(&self) -> bool {
        (self.head + 1) % self.capacity() == self.tail
    }

    fn len(&self) -> usize {
        if self.head >= self.tail {
            self.head - self.tail
        } else {
            self.capacity() - self.tail + self.head
        }
    }
}

/// Bounded MPMC ring buffer with blocking push/pop and cooperative shutdown.
///
/// One slot is always left empty so that `head == tail` means empty and
/// `head + 1 == tail` means full. A buffer of capacity `C` therefore holds
/// at most `C - 1` records.
pub struct RingBuffer<T> {
    slots: Mutex<Slots<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    /// Mirror of `Slots::shutdown` for lock-free checks
    shutdown_flag: AtomicBool,
    /// Total records written (for statistics)
    total_pushed: AtomicUsize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity < 2 {
            return Err(BufferError::CapacityTooSmall(capacity));
        }
        let storage = vec![T::default(); capacity].into_boxed_slice();
        debug!("Ring buffer created with {} slots", capacity);

        Ok(Self {
            slots: Mutex::new(Slots {
                storage,
                head: 0,
                tail: 0,
                shutdown: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            shutdown_flag: AtomicBool::new(false),
            total_pushed: AtomicUsize::new(0),
        })
    }

    /// Push a record, blocking while the buffer is full.
    ///
    /// Fails with [`Shutdown`] if shutdown was requested before or while
    /// waiting; the record is not written in that case.
    pub fn push(&self, item: T) -> Result<(), Shutdown> {
        let mut slots = self.slots.lock();
        while slots.is_full() && !slots.shutdown {
            self.not_full.wait(&mut slots);
        }
        if slots.shutdown {
            return Err(Shutdown);
        }

        let head = slots.head;
        slots.storage[head] = item;
        slots.head = (head + 1) % slots.capacity();
        drop(slots);

        self.total_pushed.fetch_add(1, Ordering::Relaxed);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Pop the oldest record, blocking while the buffer is empty.
    ///
    /// After shutdown, records already written are still returned; only an
    /// empty, shut-down buffer reports [`Shutdown`].
    pub fn pop(&self) -> Result<T, Shutdown> {
        let mut slots = self.slots.lock();
        while slots.is_empty() && !slots.shutdown {
            self.not_empty.wait(&mut slots);
        }
        if slots.is_empty() {
            return Err(Shutdown);
        }

        let item = Self::take(&mut slots);
        drop(slots);

        self.not_full.notify_one();
        Ok(item)
    }

    /// Pop without blocking, `None` if nothing is available
    pub fn try_pop(&self) -> Option<T> {
        let mut slots = self.slots.lock();
        if slots.is_empty() {
            return None;
        }

        let item = Self::take(&mut slots);
        drop(slots);

        self.not_full.notify_one();
        Some(item)
    }

    fn take(slots: &mut Slots<T>) -> T {
        let tail = slots.tail;
        let item = slots.storage[tail];
        slots.tail = (tail + 1) % slots.capacity();
        item
    }
}

impl<T> RingBuffer<T> {
    /// Request shutdown and wake every blocked producer and consumer.
    ///
    /// Idempotent. After this, `push` always fails and `pop` fails once the
    /// buffer is drained.
    pub fn shutdown(&self) {
        let mut slots = self.slots.lock();
        if slots.shutdown {
            return;
        }
        slots.shutdown = true;
        self.shutdown_flag.store(true, Ordering::Release);
        let pending = slots.len();
        drop(slots);

        info!("Ring buffer shutdown requested ({} records pending)", pending);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Check whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    /// Get the number of records currently in the buffer.
    ///
    /// Racy: the value may be stale as soon as it returns.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Check if buffer is empty (racy, diagnostics only)
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.slots.lock().capacity()
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        let slots = self.slots.lock();
        slots.len() as f64 / (slots.capacity() - 1) as f64
    }

    /// Get total records written (for statistics)
    pub fn total_pushed(&self) -> usize {
        self.total_pushed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_rejects_tiny_capacity() {
        assert_eq!(
            RingBuffer::<u32>::new(0).err(),
            Some(BufferError::CapacityTooSmall(0))
        );
        assert_eq!(
            RingBuffer::<u32>::new(1).err(),
            Some(BufferError::CapacityTooSmall(1))
        );
        assert!(RingBuffer::<u32>::new(2).is_ok());
    }

    #[test]
    fn test_push_and_pop() {
        let buffer = RingBuffer::new(10).unwrap();

        for i in 0..5u32 {
            buffer.push(i * 100).unwrap();
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.pop(), Ok(0));
        assert_eq!(buffer.pop(), Ok(100));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.total_pushed(), 5);
    }

    #[test]
    fn test_try_pop_empty() {
        let buffer = RingBuffer::<u32>::new(4).unwrap();
        assert_eq!(buffer.try_pop(), None);

        buffer.push(7).unwrap();
        assert_eq!(buffer.try_pop(), Some(7));
        assert_eq!(buffer.try_pop(), None);
    }

    #[test]
    fn test_wraps_around() {
        let buffer = RingBuffer::new(4).unwrap();
        for round in 0..10u32 {
            buffer.push(round).unwrap();
            buffer.push(round + 100).unwrap();
            assert_eq!(buffer.pop(), Ok(round));
            assert_eq!(buffer.pop(), Ok(round + 100));
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fill_ratio() {
        let buffer = RingBuffer::<u8>::new(101).unwrap();
        assert_eq!(buffer.fill_ratio(), 0.0);

        for _ in 0..50 {
            buffer.push(0).unwrap();
        }

        assert!((buffer.fill_ratio() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_full_push_blocks_until_pop() {
        let buffer = Arc::new(RingBuffer::new(4).unwrap());
        for i in 0..3u32 {
            buffer.push(i).unwrap();
        }

        let (done_tx, done_rx) = mpsc::channel();
        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                let result = buffer.push(99);
                done_tx.send(result).unwrap();
            })
        };

        // Fourth push must wait, not overwrite
        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(buffer.len(), 3);

        assert_eq!(buffer.pop(), Ok(0));
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(Ok(())));
        producer.join().unwrap();

        assert_eq!(buffer.pop(), Ok(1));
        assert_eq!(buffer.pop(), Ok(2));
        assert_eq!(buffer.pop(), Ok(99));
    }

    #[test]
    fn test_shutdown_wakes_blocked_pop() {
        let buffer = Arc::new(RingBuffer::<u32>::new(8).unwrap());
        let (done_tx, done_rx) = mpsc::channel();

        let consumer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                done_tx.send(buffer.pop()).unwrap();
            })
        };

        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
        buffer.shutdown();
        assert_eq!(
            done_rx.recv_timeout(Duration::from_secs(2)),
            Ok(Err(Shutdown))
        );
        consumer.join().unwrap();
    }

    #[test]
    fn test_shutdown_wakes_blocked_push() {
        let buffer = Arc::new(RingBuffer::new(2).unwrap());
        buffer.push(1u32).unwrap();
        let (done_tx, done_rx) = mpsc::channel();

        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                done_tx.send(buffer.push(2)).unwrap();
            })
        };

        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
        buffer.shutdown();
        assert_eq!(
            done_rx.recv_timeout(Duration::from_secs(2)),
            Ok(Err(Shutdown))
        );
        producer.join().unwrap();

        // The blocked record was never written
        assert_eq!(buffer.pop(), Ok(1));
        assert_eq!(buffer.pop(), Err(Shutdown));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let buffer = RingBuffer::<u32>::new(4).unwrap();
        buffer.push(5).unwrap();
        buffer.shutdown();
        buffer.shutdown();

        assert!(buffer.is_shutdown());
        assert_eq!(buffer.push(6), Err(Shutdown));
        assert_eq!(buffer.pop(), Ok(5));
        assert_eq!(buffer.pop(), Err(Shutdown));
        assert_eq!(buffer.pop(), Err(Shutdown));
    }

    #[test]
    fn test_concurrent_shutdown_from_many_threads() {
        let buffer = Arc::new(RingBuffer::<u32>::new(4).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || buffer.shutdown())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(buffer.is_shutdown());
        assert_eq!(buffer.pop(), Err(Shutdown));
    }

    #[test]
    fn test_no_lost_wakeups_under_contention() {
        for (entities, ticks) in [(1usize, 1usize), (1, 50), (20, 1), (20, 40), (7, 13)] {
            let buffer = Arc::new(RingBuffer::new(16).unwrap());
            let mut rng = fastrand::Rng::with_seed((entities * 1000 + ticks) as u64);
            let producer_delays: Vec<u64> = (0..ticks).map(|_| rng.u64(0..200)).collect();
            let consumer_delays: Vec<u64> =
                (0..entities * ticks).map(|_| rng.u64(0..20)).collect();

            let producer = {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for (tick, delay) in producer_delays.into_iter().enumerate() {
                        for entity in 0..entities {
                            buffer.push((tick, entity)).unwrap();
                        }
                        thread::sleep(Duration::from_micros(delay));
                    }
                    buffer.shutdown();
                })
            };

            let mut received = Vec::with_capacity(entities * ticks);
            let mut delays = consumer_delays.into_iter();
            while let Ok(record) = buffer.pop() {
                received.push(record);
                if let Some(delay) = delays.next() {
                    thread::sleep(Duration::from_micros(delay));
                }
            }
            producer.join().unwrap();

            let expected: Vec<_> = (0..ticks)
                .flat_map(|tick| (0..entities).map(move |entity| (tick, entity)))
                .collect();
            assert_eq!(received, expected);
        }
    }

    proptest! {
        #[test]
        fn prop_fifo_order(items in proptest::collection::vec(any::<u64>(), 0..63)) {
            let buffer = RingBuffer::new(64).unwrap();
            for item in &items {
                buffer.push(*item).unwrap();
            }
            let popped: Vec<u64> = (0..items.len()).map(|_| buffer.pop().unwrap()).collect();
            prop_assert_eq!(popped, items);
            prop_assert!(buffer.is_empty());
        }

        #[test]
        fn prop_capacity_never_exceeded(capacity in 2usize..32, extra in 1usize..8) {
            let buffer = RingBuffer::new(capacity).unwrap();
            for i in 0..capacity - 1 {
                buffer.push(i).unwrap();
            }
            prop_assert_eq!(buffer.len(), capacity - 1);
            prop_assert_eq!(buffer.fill_ratio(), 1.0);

            // Interleave further pushes with pops; the oldest unread record
            // must survive every push.
            for i in 0..extra.min(capacity - 1) {
                prop_assert_eq!(buffer.pop().unwrap(), i);
                buffer.push(capacity + i).unwrap();
                prop_assert_eq!(buffer.len(), capacity - 1);
            }
        }

        #[test]
        fn prop_shutdown_drains_before_failing(items in proptest::collection::vec(any::<u32>(), 0..31)) {
            let buffer = RingBuffer::new(32).unwrap();
            for item in &items {
                buffer.push(*item).unwrap();
            }
            buffer.shutdown();

            for item in &items {
                prop_assert_eq!(buffer.pop(), Ok(*item));
            }
            prop_assert_eq!(buffer.pop(), Err(Shutdown));
        }
    }
}
