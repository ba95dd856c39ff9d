//! Cancellation token scoped to pending submissions
//!
//! A [`CancellationToken`] lets the producer of a job abandon a `submit`
//! call that is blocked waiting for queue capacity. Cancellation is one-shot
//! and observable in two ways: a lock-free flag check for hot paths, and a
//! channel that becomes ready exactly when the token is cancelled, so that
//! a pending submission can wait on it inside a `select!`.
//!
//! Cancelling a token does not affect a job that already entered the queue
//! or is running inside a worker; it only covers the enqueue attempt.
//!
//! # Example
//!
//! ```rust
//! use workpool::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let clone = token.clone();
//!
//! assert!(!clone.is_cancelled());
//! token.cancel();
//! assert!(clone.is_cancelled());
//!
//! // Idempotent
//! token.cancel();
//! ```

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct CancellationTokenInner {
    cancelled: AtomicBool,
    // Held until cancellation; dropping it disconnects `signal`, which is
    // what makes a blocked select arm fire.
    guard: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

/// A thread-safe, one-shot cancellation token shared between a producer and
/// its pending submissions.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationTokenInner>,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled)
    pub fn new() -> Self {
        let (guard, signal) = bounded::<()>(0);
        Self {
            inner: Arc::new(CancellationTokenInner {
                cancelled: AtomicBool::new(false),
                guard: Mutex::new(Some(guard)),
                signal,
            }),
        }
    }

    /// Cancel this token.
    ///
    /// Idempotent: only the first call has any effect. All clones observe
    /// the cancellation, and any submission currently blocked on this token
    /// is woken.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        // Disconnects `signal`; nothing is ever sent through the channel.
        self.inner.guard.lock().take();
    }

    /// Check if this token has been cancelled.
    ///
    /// Lock-free, suitable for frequent checking.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// A receiver that becomes ready (by disconnecting) when the token is
    /// cancelled. Never yields a message; intended for `select!` arms.
    pub fn observe(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
