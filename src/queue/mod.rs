//! Bounded submission queue shared by producers and workers.
//!
//! The queue is the pool's sole synchronization point between submission
//! calls and worker threads. Producers and consumers never touch shared
//! memory directly; everything flows through the blocking-handoff channel
//! wrapped by [`BoundedQueue`].

mod bounded;

pub use bounded::BoundedQueue;
