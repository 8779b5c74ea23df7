//! # Elastic Pool
//!
//! An elastic, non-blocking worker pool with FIFO backpressure and idle-worker
//! reclamation.
//!
//! ## Features
//!
//! - **Elastic growth**: workers are spawned on demand, up to an optional cap
//! - **Idle reuse**: the most-recently-idle worker is reused first (LIFO)
//! - **FIFO backpressure**: once the cap is reached, tasks queue in
//!   submission order instead of blocking the submitter
//! - **Non-blocking submission**: `submit` never waits for a task to run
//! - **Reclamation**: idle capacity can be shed explicitly at any time
//! - **Panic isolation**: a panicking task is caught and logged; its worker
//!   survives and the pool's accounting stays correct
//!
//! ## Quick Start
//!
//! ```rust
//! use elastic_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Unbounded pool, grows on demand
//! let pool = WorkerPool::new()?;
//!
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("task {} executing", i);
//!         Ok(())
//!     })?;
//! }
//! # std::thread::sleep(std::time::Duration::from_millis(100));
//! # Ok(())
//! # }
//! ```
//!
//! ## Pool Configuration
//!
//! ```rust
//! use elastic_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new()
//!     .with_initial_workers(2)
//!     .with_max_workers(8)
//!     .with_thread_name_prefix("my-worker");
//!
//! let pool = WorkerPool::with_config(config)?;
//! assert_eq!(pool.status().idle_workers, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use elastic_pool::prelude::*;
//!
//! struct MyTask {
//!     data: String,
//! }
//!
//! impl Task for MyTask {
//!     fn execute(&mut self) -> Result<()> {
//!         println!("Processing: {}", self.data);
//!         Ok(())
//!     }
//!
//!     fn task_type(&self) -> &str {
//!         "MyTask"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = WorkerPool::new()?;
//! pool.submit(MyTask {
//!     data: "test".to_string(),
//! })?;
//! # std::thread::sleep(std::time::Duration::from_millis(50));
//! # Ok(())
//! # }
//! ```
//!
//! ## Occupancy and Reclamation
//!
//! ```rust
//! use elastic_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::with_max_workers(4)?;
//! # for _ in 0..4 {
//! #     pool.execute(|| Ok(()))?;
//! # }
//! # std::thread::sleep(std::time::Duration::from_millis(100));
//! let status = pool.status();
//! println!(
//!     "workers: {} total, {} idle, {} tasks blocked",
//!     status.total_workers, status.idle_workers, status.blocked_tasks
//! );
//!
//! // Shed idle capacity
//! let reclaimed = pool.reclaim_idle_workers();
//! println!("reclaimed {} idle workers", reclaimed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Default Pool
//!
//! A process-wide default pool is available for code that does not want to
//! manage a pool instance of its own:
//!
//! ```rust
//! use elastic_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! WorkerPool::common().execute(|| {
//!     println!("running on the default pool");
//!     Ok(())
//! })?;
//! # std::thread::sleep(std::time::Duration::from_millis(50));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;

pub use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
pub use crate::pool::{PoolConfig, PoolStats, PoolStatus, WorkerPool};
