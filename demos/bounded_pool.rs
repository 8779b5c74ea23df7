//! Bounded pool example
//!
//! Shows FIFO backpressure: once the worker cap is reached, additional tasks
//! queue in submission order instead of blocking the submitter.
//!
//! Run with: cargo run --example bounded_pool

use elastic_pool::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Elastic Pool - Bounded Pool Example ===\n");

    let pool = WorkerPool::with_max_workers(2)?;
    println!("1. Pool capped at {} workers", pool.max_workers());

    println!("\n2. Submitting 6 slow tasks:");
    for i in 0..6 {
        pool.execute(move || {
            println!("  task {} started", i);
            thread::sleep(Duration::from_millis(100));
            println!("  task {} finished", i);
            Ok(())
        })?;

        let status = pool.status();
        println!(
            "  after submit {}: {} workers, {} blocked",
            i, status.total_workers, status.blocked_tasks
        );
    }

    // Submission returned immediately; the queue drains in FIFO order.
    thread::sleep(Duration::from_millis(500));

    println!("\n3. All drained: {:?}", pool.status());
    println!(
        "   {} tasks executed by {} workers spawned",
        pool.stats().get_tasks_executed(),
        pool.stats().get_workers_spawned()
    );

    Ok(())
}
