//! Worker thread implementation

use crate::core::{PoolError, Result};
use crate::queue::BoundedQueue;
use crossbeam_utils::sync::WaitGroup;
use log::debug;
use std::sync::Arc;
use std::thread;

/// A worker thread consuming jobs from the shared queue.
///
/// A worker signals the startup rendezvous before entering its consume loop
/// and exits only once the queue is closed and drained.
///
/// Panics raised by a job are deliberately not caught: a panicking job kills
/// its worker thread, leaving the pool with one consumer fewer for the rest
/// of its life. The panic surfaces to the caller when the worker is joined
/// during shutdown.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawn a worker thread.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier for this worker
    /// * `pool_name` - Pool name, used as the thread name prefix
    /// * `queue` - Shared submission queue
    /// * `live` - Startup rendezvous; the worker releases its handle right
    ///   before it starts consuming, so that a waiter on the group knows
    ///   every worker is ready to drain the queue
    pub fn spawn(
        id: usize,
        pool_name: &str,
        queue: Arc<BoundedQueue>,
        live: WaitGroup,
    ) -> Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("{}-worker-{}", pool_name, id))
            .spawn(move || Self::run(id, queue, live))
            .map_err(|e| PoolError::spawn_with_source(id, "OS refused thread creation", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Join the worker thread, blocking until it has exited.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Join`] if the worker thread panicked, which with
    /// this pool means a job panicked while running on it.
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| PoolError::join(self.id))?;
        }
        Ok(())
    }

    /// Main worker loop.
    fn run(id: usize, queue: Arc<BoundedQueue>, live: WaitGroup) {
        debug!("worker {} live", id);
        drop(live);

        let mut processed = 0u64;
        while let Some(job) = queue.recv() {
            // No catch_unwind here: failure containment belongs to the job.
            job.run();
            processed += 1;
        }

        debug!("worker {} exiting, queue drained ({} jobs run)", id, processed);
    }
}
