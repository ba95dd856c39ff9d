//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedJob, CancellationToken, ClosureJob, Job, PoolError, Result};
pub use crate::pool::{LifecycleState, PoolConfig, WorkerPool};
