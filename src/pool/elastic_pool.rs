//! Elastic worker pool implementation

use crate::core::{BoxedTask, ClosureTask, PoolError, Result, Task};
use crate::pool::worker::{PoolStats, Worker};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Configuration for an elastic worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of workers pre-spawned idle at construction
    pub initial_workers: usize,
    /// Maximum number of live workers (0 = unbounded)
    pub max_workers: usize,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_workers: 0,
            max_workers: 0,
            thread_name_prefix: "worker".to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers pre-spawned at construction
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_initial_workers(mut self, count: usize) -> Self {
        self.initial_workers = count;
        self
    }

    /// Set the maximum number of live workers
    ///
    /// `0` means unbounded: every submission that finds no idle worker spawns
    /// a new one. With a nonzero cap, submissions past the cap are queued in
    /// FIFO order until a worker becomes idle.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_workers(mut self, count: usize) -> Self {
        self.max_workers = count;
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_workers > 0 && self.initial_workers > self.max_workers {
            return Err(PoolError::invalid_config(
                "initial_workers",
                format!(
                    "initial worker count {} exceeds max worker count {}",
                    self.initial_workers, self.max_workers
                ),
            ));
        }
        Ok(())
    }
}

/// Point-in-time occupancy snapshot of a pool
///
/// The snapshot is taken under the pool lock but is stale the instant it is
/// read. It is meant for observability, not for coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Number of live workers (idle or busy)
    pub total_workers: usize,
    /// Number of workers currently idle
    pub idle_workers: usize,
    /// Number of tasks waiting for a worker
    pub blocked_tasks: usize,
}

/// Mutable scheduler state, guarded by the pool's single lock
struct PoolState {
    total_workers: usize,
    /// LIFO stack: the most-recently-idle worker is reused first
    idle_workers: Vec<Worker>,
    /// FIFO queue, populated only once the worker cap is reached
    blocked_tasks: VecDeque<BoxedTask>,
    next_worker_id: usize,
    shut_down: bool,
}

/// Shared pool internals, referenced by the pool handle and by every worker
/// thread
pub(crate) struct PoolCore {
    config: PoolConfig,
    state: Mutex<PoolState>,
    stats: PoolStats,
}

impl PoolCore {
    pub(crate) fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Transition invoked by a worker after it finishes a task
    ///
    /// A blocked task, if any, is handed straight to the worker, which never
    /// touches the idle list in that case. Otherwise the worker joins the
    /// idle stack, or is terminated if the pool has shut down meanwhile.
    pub(crate) fn on_worker_idle(&self, worker: &Worker) {
        let mut state = self.state.lock();

        if let Some(task) = state.blocked_tasks.pop_front() {
            worker.assign(task);
        } else if state.shut_down {
            state.total_workers -= 1;
            worker.terminate();
        } else {
            state.idle_workers.push(worker.clone());
        }
    }
}

/// An elastic, non-blocking worker pool
///
/// Accepts fire-and-forget tasks and executes them on a bounded or unbounded
/// set of reusable background workers:
///
/// - an idle worker (most recently idle first) is reused when available,
/// - otherwise a new worker is spawned, unless a nonzero `max_workers` cap
///   has been reached,
/// - at the cap, tasks queue in FIFO order until a worker frees up.
///
/// [`submit`](WorkerPool::submit) never waits for a task to run or complete.
/// A slow or blocking task only ever stalls its own worker.
///
/// # Example
///
/// ```rust
/// use elastic_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::with_max_workers(4)?;
///
/// for i in 0..10 {
///     pool.execute(move || {
///         println!("task {} executing", i);
///         Ok(())
///     })?;
/// }
/// # std::thread::sleep(std::time::Duration::from_millis(100));
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    core: Arc<PoolCore>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status();
        f.debug_struct("WorkerPool")
            .field("config", &self.core.config)
            .field("status", &status)
            .finish()
    }
}

impl WorkerPool {
    /// Create a new worker pool with default configuration
    ///
    /// The default pool is unbounded and starts with no workers; the fleet
    /// grows on demand.
    pub fn new() -> Result<Self> {
        Self::with_config(PoolConfig::default())
    }

    /// Create a worker pool capped at the given number of workers
    pub fn with_max_workers(max_workers: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new().with_max_workers(max_workers))
    }

    /// Create a worker pool with custom configuration
    ///
    /// Pre-spawns `initial_workers` idle workers synchronously before
    /// returning.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let initial = config.initial_workers;
        let pool = Self {
            core: Arc::new(PoolCore {
                config,
                state: Mutex::new(PoolState {
                    total_workers: 0,
                    idle_workers: Vec::new(),
                    blocked_tasks: VecDeque::new(),
                    next_worker_id: 0,
                    shut_down: false,
                }),
                stats: PoolStats::new(),
            }),
        };

        {
            let mut state = pool.core.state.lock();
            for _ in 0..initial {
                let worker = pool.spawn_worker(&mut state)?;
                state.idle_workers.push(worker);
            }
        }

        Ok(pool)
    }

    /// Get the process-wide default pool
    ///
    /// Lazily constructed on first use with the default configuration
    /// (unbounded, no pre-spawned workers). The instance lives for the rest
    /// of the process.
    pub fn common() -> &'static WorkerPool {
        static COMMON: OnceCell<WorkerPool> = OnceCell::new();

        COMMON.get_or_init(|| {
            WorkerPool::with_config(PoolConfig::default())
                .expect("default pool configuration is valid and spawns no workers")
        })
    }

    /// Submit a task to the pool
    ///
    /// Never blocks and never waits for the task to run: the task is handed
    /// to an idle worker, a freshly spawned worker, or the FIFO blocked
    /// queue, in that order of preference.
    ///
    /// This is fire-and-forget. The task's own outcome is not reported back;
    /// a task that returns an error or panics is counted and logged by its
    /// worker and the worker lives on.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ShutDown`] - the pool no longer accepts tasks
    /// - [`PoolError::Spawn`] - a new worker thread could not be created
    pub fn submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        self.dispatch(Box::new(task))
    }

    /// Submit a closure as a task
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureTask::new(f))
    }

    fn dispatch(&self, task: BoxedTask) -> Result<()> {
        let mut state = self.core.state.lock();

        if state.shut_down {
            return Err(PoolError::shut_down(0));
        }

        // Reuse the most-recently-idle worker first.
        if let Some(worker) = state.idle_workers.pop() {
            worker.assign(task);
            return Ok(());
        }

        let max = self.core.config.max_workers;
        if max == 0 || state.total_workers < max {
            let worker = self.spawn_worker(&mut state)?;
            worker.assign(task);
            return Ok(());
        }

        // Cap reached and nobody idle: FIFO backpressure.
        state.blocked_tasks.push_back(task);
        Ok(())
    }

    /// Spawn one worker and account for it. Caller holds the state lock.
    fn spawn_worker(&self, state: &mut PoolState) -> Result<Worker> {
        let id = state.next_worker_id;
        state.next_worker_id += 1;

        let worker = Worker::spawn(
            id,
            &self.core.config.thread_name_prefix,
            Arc::clone(&self.core),
        )?;

        state.total_workers += 1;
        self.core.stats.increment_spawned();
        Ok(worker)
    }

    /// Get a point-in-time occupancy snapshot
    ///
    /// Callers must treat the snapshot as stale the instant it is read.
    pub fn status(&self) -> PoolStatus {
        let state = self.core.state.lock();
        PoolStatus {
            total_workers: state.total_workers,
            idle_workers: state.idle_workers.len(),
            blocked_tasks: state.blocked_tasks.len(),
        }
    }

    /// Stop every currently idle worker and return how many were stopped
    ///
    /// Workers in the middle of a task are unaffected; when such a worker
    /// finishes it re-enters the idle stack through the normal path and stays
    /// counted in `total_workers`, so the occupancy accounting never drifts.
    pub fn reclaim_idle_workers(&self) -> usize {
        let mut state = self.core.state.lock();

        let reclaimed = state.idle_workers.len();
        for worker in state.idle_workers.drain(..) {
            debug!("reclaiming idle worker {}", worker.id());
            worker.terminate();
        }
        state.total_workers -= reclaimed;

        reclaimed
    }

    /// Shut down the pool
    ///
    /// Stops accepting new tasks, terminates all idle workers and drops any
    /// still-blocked tasks. Busy workers finish their current task and then
    /// exit when they report idle. Calling this more than once is a no-op.
    pub fn shutdown(&self) {
        let mut state = self.core.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;

        let dropped = state.blocked_tasks.len();
        state.blocked_tasks.clear();
        if dropped > 0 {
            warn!("pool shut down with {} blocked tasks dropped", dropped);
        }

        let idle = state.idle_workers.len();
        for worker in state.idle_workers.drain(..) {
            worker.terminate();
        }
        state.total_workers -= idle;
    }

    /// Check whether the pool has been shut down
    pub fn is_shut_down(&self) -> bool {
        self.core.state.lock().shut_down
    }

    /// Get the configured worker cap (0 = unbounded)
    pub fn max_workers(&self) -> usize {
        self.core.config.max_workers
    }

    /// Get the pool's execution counters
    pub fn stats(&self) -> &PoolStats {
        &self.core.stats
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
