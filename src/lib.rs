//! # workpool
//!
//! A bounded worker pool that executes externally supplied jobs on a fixed
//! number of threads and shuts down without losing or double-executing any
//! job accepted before shutdown began.
//!
//! ## Features
//!
//! - **Fixed worker set**: exactly `worker_count` threads, spawned once;
//!   `start` blocks until every worker is demonstrably consuming
//! - **Bounded submission queue**: FIFO blocking handoff with a fixed
//!   capacity chosen at startup
//! - **Cancellable submission**: a submission blocked on a full queue can be
//!   abandoned through a [`CancellationToken`]
//! - **Ordered, leak-free shutdown**: `close` drains in-flight submissions,
//!   closes the queue, and waits for workers to finish the backlog; jobs
//!   offered during or after shutdown are retained in memory, never run
//!
//! ## Quick start
//!
//! ```rust
//! use workpool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new("metrics", 4)?;
//! pool.start(16)?;
//!
//! let token = CancellationToken::new();
//! for i in 0..10 {
//!     pool.submit(
//!         ClosureJob::new(move || {
//!             println!("job {} executing", i);
//!         })
//!         .boxed(),
//!         &token,
//!     );
//! }
//!
//! // Blocks until all ten jobs have run.
//! pool.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom jobs
//!
//! ```rust
//! use workpool::prelude::*;
//!
//! struct PersistGauge {
//!     name: String,
//!     value: f64,
//! }
//!
//! impl Job for PersistGauge {
//!     fn run(self: Box<Self>) {
//!         // persist self.value under self.name; failure handling is the
//!         // job's own business, the pool never inspects it
//!         let _ = (self.name, self.value);
//!     }
//!
//!     fn name(&self) -> &str {
//!         "PersistGauge"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new("store", 2)?;
//! pool.start(8)?;
//! let token = CancellationToken::new();
//! pool.submit(
//!     Box::new(PersistGauge {
//!         name: "cpu".to_string(),
//!         value: 0.42,
//!     }),
//!     &token,
//! );
//! pool.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Submission is best-effort
//!
//! `submit` resolves as a race between three events: the shutdown broadcast
//! (job retained in the unfinished-job ledger), queue capacity (job
//! enqueued) and cancellation (job abandoned). When shutdown has fired, the
//! ledger branch wins even if the queue still has room, so post-shutdown
//! submissions deterministically never run. The ledger is observable only
//! as a count ([`WorkerPool::unfinished_jobs`]); this crate does not retry
//! or replay retained jobs.
//!
//! ## Failure containment
//!
//! The pool does not catch panics raised inside a job. A panicking job
//! kills its worker thread, leaving the pool with one consumer fewer for
//! the remainder of its life; the panic surfaces as an error from
//! [`WorkerPool::close`]. Jobs that need containment should catch their own
//! failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;

pub use crate::core::{BoxedJob, CancellationToken, ClosureJob, Job, PoolError, Result};
pub use crate::pool::{LifecycleState, PoolConfig, WorkerPool};
