//! Job trait and related types

use std::fmt;

/// A unit of work executed by the pool.
///
/// A job runs exactly once, takes no arguments and produces no result.
/// Whatever side effect it performs (persisting a metric, calling a remote
/// endpoint) and whatever failure handling it needs belong entirely to the
/// implementation; the pool never inspects a job's internals.
pub trait Job: Send + 'static {
    /// Execute the job, consuming it.
    fn run(self: Box<Self>);

    /// Get the job's name for debugging and logging
    fn name(&self) -> &str {
        "job"
    }
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({})", self.name())
    }
}

/// A boxed job that can be sent across threads
pub type BoxedJob = Box<dyn Job>;

/// Helper to create a job from a closure
pub struct ClosureJob<F>
where
    F: FnOnce() + Send + 'static,
{
    closure: F,
    name: String,
}

impl<F> ClosureJob<F>
where
    F: FnOnce() + Send + 'static,
{
    /// Create a new closure job
    pub fn new(closure: F) -> Self {
        Self {
            closure,
            name: "ClosureJob".to_string(),
        }
    }

    /// Create a new closure job with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure,
            name: name.into(),
        }
    }

    /// Box the job for submission
    pub fn boxed(self) -> BoxedJob {
        Box::new(self)
    }
}

impl<F> Job for ClosureJob<F>
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (self.closure)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
