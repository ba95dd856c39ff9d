//! Worker pool: lifecycle controller, submission path and worker threads

mod worker;
mod worker_pool;

pub use worker::Worker;
pub use worker_pool::{LifecycleState, PoolConfig, WorkerPool};
