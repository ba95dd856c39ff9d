//! End-to-end properties of the worker pool: startup rendezvous, no-loss
//! shutdown, shutdown retention and submission cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use workpool::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn construction_validates_worker_count() {
    init_logging();
    assert!(matches!(
        WorkerPool::new("invalid", 0),
        Err(PoolError::InvalidConfig { .. })
    ));
    assert!(WorkerPool::new("valid", 1).is_ok());
}

#[test]
fn start_validates_queue_capacity() {
    init_logging();
    let pool = WorkerPool::new("capacity", 2).expect("create pool");
    assert!(matches!(
        pool.start(0),
        Err(PoolError::InvalidConfig { .. })
    ));
    assert_eq!(pool.state(), LifecycleState::Uninitialized);
}

#[test]
fn ten_jobs_three_workers_run_exactly_once() {
    // Scenario from the drawing board: worker_count=3, queue_capacity=5,
    // ten no-op jobs with an uncancelled token. close() must return only
    // after all ten ran exactly once.
    init_logging();
    let pool = WorkerPool::new("ten-jobs", 3).expect("create pool");
    pool.start(5).expect("start pool");

    let counter = Arc::new(AtomicUsize::new(0));
    let token = CancellationToken::new();
    for _ in 0..10 {
        let counter = Arc::clone(&counter);
        pool.submit(
            ClosureJob::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .boxed(),
            &token,
        );
    }

    pool.close().expect("close pool");
    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert_eq!(pool.unfinished_jobs(), 0);
}

#[test]
fn exactly_worker_count_jobs_run_concurrently() {
    init_logging();
    let pool = WorkerPool::new("concurrency", 4).expect("create pool");
    pool.start(4).expect("start pool");

    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Arc::new(Mutex::new(release_rx));
    let token = CancellationToken::new();

    for _ in 0..4 {
        let started = started_tx.clone();
        let release = Arc::clone(&release_rx);
        pool.submit(
            ClosureJob::new(move || {
                started.send(()).ok();
                let _ = release.lock().expect("release lock").recv();
            })
            .boxed(),
            &token,
        );
    }

    // All four workers pick up a job without any of them queueing.
    for _ in 0..4 {
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker went live and consumed");
    }
    assert_eq!(pool.queue_len(), 0);

    for _ in 0..4 {
        release_tx.send(()).ok();
    }
    pool.close().expect("close pool");
}

#[test]
fn close_races_concurrent_producers_without_losing_jobs() {
    init_logging();
    let pool = Arc::new(WorkerPool::new("storm", 4).expect("create pool"));
    pool.start(8).expect("start pool");

    let executed = Arc::new(AtomicUsize::new(0));
    let producers: Vec<_> = (0..10)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let executed = Arc::clone(&executed);
            thread::spawn(move || {
                let token = CancellationToken::new();
                for _ in 0..100 {
                    let executed = Arc::clone(&executed);
                    pool.submit(
                        ClosureJob::new(move || {
                            executed.fetch_add(1, Ordering::SeqCst);
                        })
                        .boxed(),
                        &token,
                    );
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    // Must not fault while producers are mid-submission.
    pool.close().expect("close pool during submissions");

    for producer in producers {
        producer.join().expect("producer thread panicked");
    }

    // Every accepted job ran exactly once; every rejected one is retained.
    assert_eq!(
        executed.load(Ordering::SeqCst) + pool.unfinished_jobs(),
        10 * 100
    );
}

#[test]
fn jobs_offered_after_close_are_retained_not_run() {
    init_logging();
    let pool = WorkerPool::new("retention", 2).expect("create pool");
    pool.start(4).expect("start pool");
    pool.close().expect("close pool");

    let executed = Arc::new(AtomicUsize::new(0));
    let token = CancellationToken::new();
    for _ in 0..5 {
        let executed = Arc::clone(&executed);
        pool.submit(
            ClosureJob::new(move || {
                executed.fetch_add(1, Ordering::SeqCst);
            })
            .boxed(),
            &token,
        );
    }

    assert_eq!(pool.unfinished_jobs(), 5);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[test]
fn precancelled_submission_on_full_queue_returns_promptly() {
    // Scenario: worker_count=1, queue_capacity=1, token cancelled up front,
    // queue already full. The submission must return without queueing and
    // without touching the ledger.
    init_logging();
    let pool = WorkerPool::new("precancel", 1).expect("create pool");
    pool.start(1).expect("start pool");

    let (started_tx, started_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let token = CancellationToken::new();

    pool.submit(
        ClosureJob::new(move || {
            started_tx.send(()).ok();
            let _ = done_rx.recv();
        })
        .boxed(),
        &token,
    );
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker picked up the blocking job");
    pool.submit(ClosureJob::new(|| {}).boxed(), &token);

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let abandoned = Arc::new(AtomicUsize::new(0));
    let abandoned_clone = Arc::clone(&abandoned);
    let start = std::time::Instant::now();
    pool.submit(
        ClosureJob::new(move || {
            abandoned_clone.fetch_add(1, Ordering::SeqCst);
        })
        .boxed(),
        &cancelled,
    );
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(1),
        "cancelled submission should not block, took {:?}",
        elapsed
    );
    assert_eq!(pool.unfinished_jobs(), 0);
    assert_eq!(pool.queue_len(), 1);

    done_tx.send(()).ok();
    pool.close().expect("close pool");
    assert_eq!(abandoned.load(Ordering::SeqCst), 0);
}

#[test]
fn multiple_pools_do_not_interfere() {
    init_logging();
    let first = WorkerPool::new("first", 2).expect("create first");
    let second = WorkerPool::new("second", 2).expect("create second");
    first.start(4).expect("start first");
    second.start(4).expect("start second");

    let counter = Arc::new(AtomicUsize::new(0));
    let token = CancellationToken::new();
    for _ in 0..4 {
        let counter = Arc::clone(&counter);
        first.submit(
            ClosureJob::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .boxed(),
            &token,
        );
    }

    first.close().expect("close first");
    assert!(second.is_running());

    let counter_second = Arc::clone(&counter);
    second.submit(
        ClosureJob::new(move || {
            counter_second.fetch_add(1, Ordering::SeqCst);
        })
        .boxed(),
        &token,
    );
    second.close().expect("close second");

    assert_eq!(counter.load(Ordering::SeqCst), 5);
}
