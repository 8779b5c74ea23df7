//! Basic worker pool usage example
//!
//! Demonstrates pool creation, fire-and-forget submission, occupancy
//! snapshots and idle-worker reclamation.
//!
//! Run with: cargo run --example basic_usage

use elastic_pool::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Elastic Pool - Basic Usage Example ===\n");

    // Unbounded pool with one worker pre-spawned
    let config = PoolConfig::new().with_initial_workers(1);
    let pool = WorkerPool::with_config(config)?;

    println!("1. Submitting 10 tasks:");
    for i in 0..10 {
        pool.execute(move || {
            println!(
                "  task {} executing on thread {:?}",
                i,
                thread::current().name()
            );
            thread::sleep(Duration::from_millis(50));
            Ok(())
        })?;
    }

    let status = pool.status();
    println!(
        "\n2. Occupancy right after submission: {} workers, {} idle, {} blocked",
        status.total_workers, status.idle_workers, status.blocked_tasks
    );

    // Wait for everything to drain
    thread::sleep(Duration::from_millis(200));

    let status = pool.status();
    println!(
        "3. Occupancy after the burst: {} workers, {} idle",
        status.total_workers, status.idle_workers
    );
    println!(
        "   {} tasks executed, average busy time {:.1}us",
        pool.stats().get_tasks_executed(),
        pool.stats().get_average_busy_time_us()
    );

    let reclaimed = pool.reclaim_idle_workers();
    println!("\n4. Reclaimed {} idle workers", reclaimed);
    println!("   final occupancy: {:?}", pool.status());

    // The process-wide default pool works without any setup
    WorkerPool::common().execute(|| {
        println!("\n5. Task on the default pool");
        Ok(())
    })?;
    thread::sleep(Duration::from_millis(50));

    Ok(())
}
