//! Worker pool implementation

use crate::core::{BoxedJob, CancellationToken, PoolError, Result};
use crate::pool::worker::Worker;
use crate::queue::BoundedQueue;
use crossbeam_channel::{select, TrySendError};
use crossbeam_utils::sync::WaitGroup;
use log::{debug, error, warn};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle of a pool. Monotonic: a pool never moves backwards through
/// these states and a `Closed` pool cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Created but not started; no queue, no workers
    Uninitialized = 0,
    /// `start` is spawning workers and waiting for the live rendezvous
    Starting = 1,
    /// Accepting submissions
    Running = 2,
    /// `close` is draining in-flight submissions and the backlog
    Closing = 3,
    /// All workers joined; terminal
    Closed = 4,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Uninitialized,
            1 => LifecycleState::Starting,
            2 => LifecycleState::Running,
            3 => LifecycleState::Closing,
            _ => LifecycleState::Closed,
        }
    }
}

/// Configuration for a worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Pool name, used for thread names and diagnostics only
    pub name: String,
    /// Number of worker threads, fixed for the pool's lifetime
    pub worker_count: usize,
}

impl PoolConfig {
    /// Create a new configuration
    pub fn new<S: Into<String>>(name: S, worker_count: usize) -> Self {
        Self {
            name: name.into(),
            worker_count,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(PoolError::invalid_config(
                "worker_count",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A bounded worker pool that executes jobs on a fixed number of threads
/// and shuts down without losing or double-executing accepted work.
///
/// # Lifecycle
///
/// Create with [`new`](Self::new), call [`start`](Self::start) once, submit
/// jobs concurrently with [`submit`](Self::submit), and finish with
/// [`close`](Self::close). `close` returns only after every job that
/// entered the queue has run.
///
/// # Submission semantics
///
/// `submit` is best-effort: a job offered during or after shutdown is
/// retained in an in-memory ledger instead of being run, and a submission
/// abandoned through its [`CancellationToken`] is dropped outright. Callers
/// needing a delivery guarantee must treat cancellation as "not delivered"
/// and handle it at a higher layer.
///
/// # Example
///
/// ```rust
/// use workpool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new("uploader", 3)?;
/// pool.start(5)?;
///
/// let token = CancellationToken::new();
/// for i in 0..10 {
///     pool.submit(ClosureJob::new(move || println!("job {}", i)).boxed(), &token);
/// }
///
/// pool.close()?;
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    config: PoolConfig,
    state: AtomicU8,
    queue: RwLock<Option<Arc<BoundedQueue>>>,
    workers: Mutex<Vec<Worker>>,
    // Broadcast observed by every pending submission; fired once by close().
    shutdown: CancellationToken,
    // Rendezvous on submissions that have not yet resolved. Taken by close()
    // so the queue is never shut while a producer might be mid-send.
    in_flight: Mutex<Option<WaitGroup>>,
    unfinished: Mutex<Vec<BoxedJob>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("unfinished_jobs", &self.unfinished_jobs())
            .finish()
    }
}

impl WorkerPool {
    /// Create a new pool with the given name and worker count.
    ///
    /// No side effects beyond in-memory initialization; workers are spawned
    /// by [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `worker_count` is 0.
    pub fn new<S: Into<String>>(name: S, worker_count: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(name, worker_count))
    }

    /// Create a pool from a configuration
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
            queue: RwLock::new(None),
            workers: Mutex::new(Vec::new()),
            shutdown: CancellationToken::new(),
            in_flight: Mutex::new(Some(WaitGroup::new())),
            unfinished: Mutex::new(Vec::new()),
        })
    }

    /// Start the pool: allocate the bounded queue and spawn the workers.
    ///
    /// Blocks until every worker has signalled that it is consuming, so no
    /// submission accepted after `start` returns can queue up without a
    /// consumer guaranteed to exist.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfig`] if `queue_capacity` is 0; the pool
    ///   stays `Uninitialized`.
    /// - [`PoolError::AlreadyRunning`] on a second call.
    /// - [`PoolError::Spawn`] if an OS thread could not be created.
    pub fn start(&self, queue_capacity: usize) -> Result<()> {
        if queue_capacity == 0 {
            return Err(PoolError::invalid_config(
                "queue_capacity",
                "must be at least 1",
            ));
        }

        self.advance(LifecycleState::Uninitialized, LifecycleState::Starting)
            .map_err(|_| {
                PoolError::already_running(&self.config.name, self.config.worker_count)
            })?;

        let queue = Arc::new(BoundedQueue::new(queue_capacity));
        let live = WaitGroup::new();

        let mut workers = Vec::with_capacity(self.config.worker_count);
        for id in 0..self.config.worker_count {
            match Worker::spawn(id, &self.config.name, Arc::clone(&queue), live.clone()) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Unwind the partial start: close the queue so the
                    // already-spawned workers exit, then fail terminally.
                    queue.close();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    self.state
                        .store(LifecycleState::Closed as u8, Ordering::Release);
                    return Err(e);
                }
            }
        }

        // Rendezvous: every worker drops its handle right before its
        // consume loop, so this returns only once all of them are live.
        live.wait();

        *self.queue.write() = Some(queue);
        *self.workers.lock() = workers;
        self.state
            .store(LifecycleState::Running as u8, Ordering::Release);

        debug!(
            "pool '{}' running with {} workers, queue capacity {}",
            self.config.name, self.config.worker_count, queue_capacity
        );
        Ok(())
    }

    /// Submit a job, waiting on a three-way race between shutdown, queue
    /// capacity and cancellation.
    ///
    /// Outcomes:
    /// - shutdown signal observed: the job lands in the unfinished-job
    ///   ledger and is never run;
    /// - the queue accepts the job (possibly after blocking while full);
    /// - `token` is cancelled first: the job is abandoned, neither queued
    ///   nor recorded.
    ///
    /// When shutdown has already fired and the queue simultaneously has
    /// capacity, shutdown wins; see the crate docs for the rationale.
    /// There is no lifecycle pre-check, so a submission racing `close`
    /// resolves through the same three events rather than a check-then-act
    /// on pool state.
    pub fn submit(&self, job: BoxedJob, token: &CancellationToken) {
        // Joined for the whole call, whichever branch fires.
        let _in_flight = self.in_flight.lock().clone();

        if self.shutdown.is_cancelled() {
            self.park_unfinished(job);
            return;
        }

        let sender = match self.queue.read().as_ref().and_then(|q| q.sender()) {
            Some(sender) => sender,
            // Queue never existed or is already closed; same outcome as the
            // shutdown branch.
            None => {
                self.park_unfinished(job);
                return;
            }
        };

        // Enqueue immediately when capacity exists at this instant, keeping
        // the common path free of the select below.
        let job = match sender.try_send(job) {
            Ok(()) => return,
            Err(TrySendError::Full(job)) => job,
            Err(TrySendError::Disconnected(job)) => {
                self.park_unfinished(job);
                return;
            }
        };

        let shutdown = self.shutdown.observe();
        let cancelled = token.observe();
        let mut slot = Some(job);
        select! {
            recv(shutdown) -> _ => {
                if let Some(job) = slot.take() {
                    self.park_unfinished(job);
                }
            }
            send(sender, slot.take().expect("submission slot consumed twice")) -> res => {
                if let Err(err) = res {
                    // Queue closed while we were blocked; in-flight
                    // accounting makes this unreachable, but the job is
                    // retained rather than lost if it ever happens.
                    self.park_unfinished(err.into_inner());
                }
            }
            recv(cancelled) -> _ => {
                // Abandoned by the caller: neither queued nor recorded.
                drop(slot.take());
            }
        }
    }

    /// Shut the pool down, blocking until all accepted work has run.
    ///
    /// Sequence: fire the shutdown broadcast, wait for in-flight
    /// submissions to resolve, close the queue, join the workers once the
    /// backlog is drained.
    ///
    /// A second call is a no-op returning `Ok(())`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotStarted`] if the pool was never started.
    /// - [`PoolError::Join`] if a worker panicked (a job panic is not
    ///   contained by the pool and kills its worker). All workers are
    ///   still joined; the first failure is returned.
    pub fn close(&self) -> Result<()> {
        if let Err(current) = self.advance(LifecycleState::Running, LifecycleState::Closing) {
            return match current {
                LifecycleState::Uninitialized | LifecycleState::Starting => {
                    Err(PoolError::not_started(&self.config.name))
                }
                _ => Ok(()),
            };
        }

        debug!("pool '{}' closing", self.config.name);

        // (a) Broadcast: wakes every submission blocked in its select.
        self.shutdown.cancel();

        // (b) No producer may be mid-send once this returns.
        if let Some(in_flight) = self.in_flight.lock().take() {
            in_flight.wait();
        }

        // (c) Stop accepting; the backlog stays consumable.
        if let Some(queue) = self.queue.read().as_ref() {
            queue.close();
        }

        // (d) Workers exit once the queue is drained.
        let workers = std::mem::take(&mut *self.workers.lock());
        let mut result = Ok(());
        for worker in workers {
            if let Err(e) = worker.join() {
                warn!("pool '{}': {}", self.config.name, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        self.state
            .store(LifecycleState::Closed as u8, Ordering::Release);

        let parked = self.unfinished_jobs();
        if parked > 0 {
            debug!(
                "pool '{}' closed with {} unfinished jobs retained",
                self.config.name, parked
            );
        } else {
            debug!("pool '{}' closed", self.config.name);
        }
        result
    }

    /// Get the pool name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the number of worker threads
    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Check if the pool is accepting submissions
    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// Number of jobs currently buffered in the queue (approximate)
    pub fn queue_len(&self) -> usize {
        self.queue.read().as_ref().map_or(0, |q| q.len())
    }

    /// Number of jobs that were offered during or after shutdown and are
    /// retained, unexecuted, in memory.
    ///
    /// The ledger itself is not exposed; this pool does not re-submit or
    /// replay retained jobs.
    pub fn unfinished_jobs(&self) -> usize {
        self.unfinished.lock().len()
    }

    fn park_unfinished(&self, job: BoxedJob) {
        debug!(
            "pool '{}': job '{}' offered during shutdown, retained unexecuted",
            self.config.name,
            job.name()
        );
        self.unfinished.lock().push(job);
    }

    /// Monotonic state transition; fails with the observed state.
    fn advance(
        &self,
        from: LifecycleState,
        to: LifecycleState,
    ) -> std::result::Result<(), LifecycleState> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(LifecycleState::from_u8)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(e) = self.close() {
                error!("pool '{}': shutdown during drop failed: {}", self.config.name, e);
            }
        }
    }
}
