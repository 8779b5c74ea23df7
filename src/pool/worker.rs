//! Worker thread implementation
//!
//! Each worker owns a single-slot inbox and a dedicated OS thread. The pool
//! hands a worker at most one task at a time; after finishing, the worker
//! reports itself idle through [`PoolCore::on_worker_idle`] and blocks on its
//! inbox again until the next handoff or a terminate message.
//!
//! A panicking task does not kill its worker: the panic is caught, counted
//! and logged, and the worker reports idle normally. This keeps the pool's
//! occupancy accounting in step with the true number of live threads.

use crate::core::{BoxedTask, PoolError, Result};
use crate::pool::elastic_pool::PoolCore;
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Execution counters shared by every worker a pool ever spawns
///
/// Counters survive worker reclamation, so totals stay meaningful even as the
/// worker fleet grows and shrinks.
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Total number of tasks that completed successfully
    pub tasks_executed: AtomicU64,
    /// Total number of tasks that returned an error
    pub tasks_failed: AtomicU64,
    /// Total number of tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total number of workers spawned over the pool's lifetime
    pub workers_spawned: AtomicU64,
    /// Total time spent executing tasks (microseconds)
    pub total_busy_time_us: AtomicU64,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment tasks executed counter
    pub fn increment_executed(&self) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks failed counter
    pub fn increment_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks panicked counter
    pub fn increment_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment workers spawned counter
    pub fn increment_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    /// Add busy time
    pub fn add_busy_time(&self, microseconds: u64) {
        self.total_busy_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get total tasks executed
    pub fn get_tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    /// Get total tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get total tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Get total workers spawned over the pool's lifetime
    pub fn get_workers_spawned(&self) -> u64 {
        self.workers_spawned.load(Ordering::Relaxed)
    }

    /// Get average busy time per task in microseconds
    pub fn get_average_busy_time_us(&self) -> f64 {
        let total = self.total_busy_time_us.load(Ordering::Relaxed);
        let count = self.tasks_executed.load(Ordering::Relaxed)
            + self.tasks_failed.load(Ordering::Relaxed)
            + self.tasks_panicked.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// Message delivered through a worker's single-slot inbox
pub(crate) enum Message {
    /// Execute this task, then report idle
    Run(BoxedTask),
    /// Exit the run loop
    Terminate,
}

/// Handle to a worker thread
///
/// The worker thread itself keeps a clone of this handle and passes it back
/// to the pool when it reports idle, so the pool's idle list always holds a
/// live sender for the worker's inbox.
#[derive(Clone)]
pub(crate) struct Worker {
    id: usize,
    inbox: Sender<Message>,
}

impl Worker {
    /// Spawn a new worker thread with a single-slot inbox
    pub(crate) fn spawn(id: usize, name_prefix: &str, core: Arc<PoolCore>) -> Result<Self> {
        let (inbox_tx, inbox_rx) = bounded(1);
        let handle = Worker { id, inbox: inbox_tx };
        let me = handle.clone();

        thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || Self::run(me, inbox_rx, core))
            .map_err(|e| PoolError::spawn_with_source(id, "cannot create worker thread", e))?;

        Ok(handle)
    }

    /// Get worker ID
    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Deliver exactly one task into the inbox
    ///
    /// The dispatch protocol guarantees the worker is idle, so the slot is
    /// free and this never blocks. A full slot means the protocol was
    /// violated somewhere; the task is dropped and the violation logged.
    pub(crate) fn assign(&self, task: BoxedTask) {
        if let Err(e) = self.inbox.try_send(Message::Run(task)) {
            error!(
                "worker {}: dispatch protocol violation, task dropped: {}",
                self.id, e
            );
        }
    }

    /// Tell the worker to exit after its current task, or immediately if idle
    pub(crate) fn terminate(&self) {
        if let Err(e) = self.inbox.try_send(Message::Terminate) {
            error!("worker {}: failed to deliver terminate: {}", self.id, e);
        }
    }

    /// Main worker loop
    ///
    /// Blocks on the inbox; runs each received task to completion, then
    /// reports idle to the pool. Exits on a terminate message or when every
    /// inbox sender is gone.
    fn run(me: Worker, inbox: Receiver<Message>, core: Arc<PoolCore>) {
        debug!("worker {} started", me.id);

        loop {
            match inbox.recv() {
                Ok(Message::Run(mut task)) => {
                    Self::execute_task(me.id, &mut task, core.stats());
                    core.on_worker_idle(&me);
                }
                Ok(Message::Terminate) | Err(_) => break,
            }
        }

        debug!("worker {} stopped", me.id);
    }

    /// Execute a single task with panic protection
    fn execute_task(id: usize, task: &mut BoxedTask, stats: &PoolStats) {
        let start = std::time::Instant::now();

        let panic_result = catch_unwind(AssertUnwindSafe(|| task.execute()));

        let elapsed_us = start.elapsed().as_micros() as u64;

        match panic_result {
            Ok(Ok(())) => {
                stats.increment_executed();
            }
            Ok(Err(e)) => {
                warn!("worker {}: task '{}' failed: {}", id, task.task_type(), e);
                stats.increment_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!(
                    "worker {}: task '{}' panicked: {}",
                    id,
                    task.task_type(),
                    panic_msg
                );
                stats.increment_panicked();
            }
        }

        stats.add_busy_time(elapsed_us);
    }
}
