//! Behavioral tests for the elastic worker pool: ordering, growth, cap
//! enforcement, reuse and reclamation.

use crossbeam_channel::bounded;
use elastic_pool::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

/// With a single-worker cap, queued tasks must execute in submission order.
#[test]
fn fifo_order_under_single_worker_cap() {
    let pool = WorkerPool::with_max_workers(1).expect("Failed to create pool");

    let order = Arc::new(Mutex::new(Vec::new()));
    let (gate_tx, gate_rx) = bounded::<()>(0);

    let n = 20usize;
    for i in 0..n {
        let order_clone = Arc::clone(&order);
        let gate = if i == 0 { Some(gate_rx.clone()) } else { None };
        pool.execute(move || {
            order_clone.lock().push(i);
            // The first task holds the only worker until every other task
            // has been submitted and queued.
            if let Some(gate) = gate {
                gate.recv().ok();
            }
            Ok(())
        })
        .expect("Failed to submit task");
    }

    // Everything but the first task is now blocked behind the cap.
    assert_eq!(pool.status().blocked_tasks, n - 1);
    gate_tx.send(()).unwrap();

    assert!(wait_until(Duration::from_secs(5), || order.lock().len() == n));
    let recorded = order.lock().clone();
    assert_eq!(recorded, (0..n).collect::<Vec<_>>());
}

/// An unbounded pool grows by one worker per concurrently running task.
#[test]
fn elastic_growth_unbounded() {
    let pool = WorkerPool::new().expect("Failed to create pool");
    let (release_tx, release_rx) = bounded::<()>(0);

    let n = 8usize;
    for _ in 0..n {
        let rx = release_rx.clone();
        pool.execute(move || {
            rx.recv().ok();
            Ok(())
        })
        .expect("Failed to submit task");
    }

    assert!(wait_until(Duration::from_secs(2), || {
        pool.status().total_workers == n
    }));
    assert_eq!(pool.status().idle_workers, 0);
    assert_eq!(pool.status().blocked_tasks, 0);

    for _ in 0..n {
        release_tx.send(()).unwrap();
    }
    assert!(wait_until(Duration::from_secs(2), || {
        pool.status().idle_workers == n
    }));
}

/// With cap k and k + m simultaneous blocking tasks, the pool holds at k
/// workers and queues exactly m tasks.
#[test]
fn cap_enforcement_queues_overflow() {
    let k = 2usize;
    let m = 3usize;
    let pool = WorkerPool::with_max_workers(k).expect("Failed to create pool");
    let (release_tx, release_rx) = bounded::<()>(0);
    let executed = Arc::new(AtomicUsize::new(0));

    for _ in 0..k + m {
        let rx = release_rx.clone();
        let executed_clone = Arc::clone(&executed);
        pool.execute(move || {
            rx.recv().ok();
            executed_clone.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .expect("Failed to submit task");
    }

    let status = pool.status();
    assert!(status.total_workers <= k);
    assert_eq!(status.blocked_tasks, m);

    for _ in 0..k + m {
        release_tx.send(()).unwrap();
    }
    assert!(wait_until(Duration::from_secs(5), || {
        executed.load(Ordering::Relaxed) == k + m
    }));
    assert_eq!(pool.status().blocked_tasks, 0);
}

/// A finished worker is reused for the next task instead of spawning anew.
#[test]
fn idle_worker_reused() {
    let pool = WorkerPool::new().expect("Failed to create pool");

    pool.execute(|| Ok(())).expect("Failed to submit task");
    assert!(wait_until(Duration::from_secs(2), || {
        pool.status().idle_workers == 1
    }));

    pool.execute(|| Ok(())).expect("Failed to submit task");
    assert!(wait_until(Duration::from_secs(2), || {
        pool.stats().get_tasks_executed() == 2
    }));

    assert_eq!(pool.status().total_workers, 1);
    assert_eq!(pool.stats().get_workers_spawned(), 1);
}

/// After all tasks finish, reclamation drives the worker count to zero.
#[test]
fn reclamation_empties_idle_fleet() {
    let pool = WorkerPool::new().expect("Failed to create pool");
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        let counter_clone = Arc::clone(&counter);
        pool.execute(move || {
            counter_clone.fetch_add(1, Ordering::Relaxed);
            thread::sleep(Duration::from_millis(5));
            Ok(())
        })
        .expect("Failed to submit task");
    }

    assert!(wait_until(Duration::from_secs(2), || {
        counter.load(Ordering::Relaxed) == 4
    }));
    assert!(wait_until(Duration::from_secs(2), || {
        let status = pool.status();
        status.idle_workers == status.total_workers
    }));

    pool.reclaim_idle_workers();

    let status = pool.status();
    assert_eq!(status.total_workers, 0);
    assert_eq!(status.idle_workers, 0);
}

/// Scenario: one pre-spawned worker, unbounded growth, 1000 short tasks.
#[test]
fn high_volume_with_growth() {
    let config = PoolConfig::new().with_initial_workers(1);
    let pool = WorkerPool::with_config(config).expect("Failed to create pool");

    let remaining = Arc::new(AtomicUsize::new(1000));
    for _ in 0..1000 {
        let remaining_clone = Arc::clone(&remaining);
        pool.execute(move || {
            thread::sleep(Duration::from_millis(10));
            remaining_clone.fetch_sub(1, Ordering::Relaxed);
            Ok(())
        })
        .expect("Failed to submit task");
    }

    let mut peak_workers = 0usize;
    assert!(wait_until(Duration::from_secs(30), || {
        peak_workers = peak_workers.max(pool.status().total_workers);
        remaining.load(Ordering::Relaxed) == 0
    }));

    assert!(
        peak_workers > 1,
        "pool never grew past its initial worker (peak: {})",
        peak_workers
    );
}

/// Scenario: initial worker count above a nonzero cap is a config error.
#[test]
fn initial_workers_above_cap_rejected() {
    let config = PoolConfig::new()
        .with_initial_workers(5)
        .with_max_workers(1);

    let result = WorkerPool::with_config(config);
    assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));
}

/// Scenario: cap of 2, two blockers, a third task queues and later runs.
#[test]
fn third_task_queues_then_runs() {
    let pool = WorkerPool::with_max_workers(2).expect("Failed to create pool");
    let (release_tx, release_rx) = bounded::<()>(0);

    for _ in 0..2 {
        let rx = release_rx.clone();
        pool.execute(move || {
            rx.recv().ok();
            Ok(())
        })
        .expect("Failed to submit task");
    }

    let third_ran = Arc::new(AtomicUsize::new(0));
    let third_clone = Arc::clone(&third_ran);
    pool.execute(move || {
        third_clone.fetch_add(1, Ordering::Relaxed);
        Ok(())
    })
    .expect("Failed to submit task");

    assert_eq!(pool.status().blocked_tasks, 1);

    release_tx.send(()).unwrap();
    release_tx.send(()).unwrap();

    assert!(wait_until(Duration::from_secs(2), || {
        third_ran.load(Ordering::Relaxed) == 1
    }));
}

/// Submissions from many threads at once all land and execute.
#[test]
fn concurrent_submission() {
    let pool = Arc::new(WorkerPool::with_max_workers(4).expect("Failed to create pool"));
    let counter = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..8 {
        let pool_clone = Arc::clone(&pool);
        let counter_clone = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let counter_inner = Arc::clone(&counter_clone);
                pool_clone
                    .execute(move || {
                        counter_inner.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    })
                    .expect("Failed to submit task");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Submitter thread panicked");
    }

    assert!(wait_until(Duration::from_secs(10), || {
        counter.load(Ordering::Relaxed) == 800
    }));
    assert!(pool.status().total_workers <= 4);
}

/// A shut-down pool refuses new tasks; busy workers still finish.
#[test]
fn shutdown_rejects_new_tasks() {
    let pool = WorkerPool::new().expect("Failed to create pool");
    let (release_tx, release_rx) = bounded::<()>(0);
    let finished = Arc::new(AtomicUsize::new(0));

    let finished_clone = Arc::clone(&finished);
    pool.execute(move || {
        release_rx.recv().ok();
        finished_clone.fetch_add(1, Ordering::Relaxed);
        Ok(())
    })
    .expect("Failed to submit task");

    pool.shutdown();
    assert!(matches!(
        pool.execute(|| Ok(())),
        Err(PoolError::ShutDown { .. })
    ));

    // The in-flight task runs to completion despite the shutdown.
    release_tx.send(()).unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        finished.load(Ordering::Relaxed) == 1
    }));
    assert!(wait_until(Duration::from_secs(2), || {
        pool.status().total_workers == 0
    }));
}
