//! Elastic worker pool and worker threads

pub mod elastic_pool;
pub mod worker;

pub use elastic_pool::{PoolConfig, PoolStatus, WorkerPool};
pub use worker::PoolStats;
