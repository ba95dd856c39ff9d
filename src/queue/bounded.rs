//! Bounded FIFO queue with blocking handoff.

use crate::core::BoxedJob;
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

/// A fixed-capacity FIFO buffer where producers block when full and
/// consumers block when empty.
///
/// Closing is a drain signal, not an abort: [`close`](Self::close) drops the
/// retained producer handle so no further jobs can be enqueued, while jobs
/// already buffered remain consumable. Consumers observe "closed and
/// drained" as [`recv`](Self::recv) returning `None`.
///
/// The queue itself does not guard against producer handles obtained before
/// `close` still completing a send; the pool prevents that by waiting for
/// in-flight submissions to resolve before closing.
pub struct BoundedQueue {
    sender: Mutex<Option<Sender<BoxedJob>>>,
    receiver: Receiver<BoxedJob>,
    capacity: usize,
}

impl BoundedQueue {
    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. The pool validates capacity before
    /// constructing the queue, so this is an internal invariant.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        let (sender, receiver) = bounded(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
            capacity,
        }
    }

    /// Returns a producer handle, or `None` if the queue has been closed.
    ///
    /// The handle blocks on send while the buffer is full and supports
    /// `try_send` and `select!` arms. Dropping it relinquishes the
    /// producer's hold on the queue.
    pub fn sender(&self) -> Option<Sender<BoxedJob>> {
        self.sender.lock().clone()
    }

    /// Receives the next job, blocking while the queue is empty.
    ///
    /// Returns `None` exactly when the queue is closed **and** drained.
    pub fn recv(&self) -> Option<BoxedJob> {
        self.receiver.recv().ok()
    }

    /// Closes the queue. Idempotent.
    ///
    /// No further producer handles can be obtained; buffered jobs remain
    /// consumable until drained.
    pub fn close(&self) {
        self.sender.lock().take();
    }

    /// Returns `true` if the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Current number of buffered jobs (approximate under concurrency).
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no jobs are buffered.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Returns the maximum capacity of this queue.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for BoundedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
