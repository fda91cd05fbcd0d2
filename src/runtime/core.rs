use super::builder::{ExecutorBuilder, ExecutorConfig, Strategy};
use super::executor::core::Core;
use super::executor::worker::Worker;
use super::stats::StatsSnapshot;
use super::strategy::distribution;
use super::task::{Callable, Runnable, TaskFuture, TaskRecord};
use crate::error::{ExecutorError, Result};

use tracing::{info, warn};

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A fixed pool of worker threads fed through a global queue.
///
/// Work is submitted with [`submit`](Self::submit) (a value-producing
/// [`Callable`]) or [`execute`](Self::execute) (a [`Runnable`]). Both
/// return a [`TaskFuture`] immediately; the task runs on whichever
/// worker ends up holding it, according to the configured [`Strategy`].
///
/// No ordering is guaranteed between tasks.
///
/// Dropping the executor shuts it down and waits for the workers, which
/// first finish every task that was already accepted.
///
/// # Examples
///
/// ```
/// use workpool::Executor;
///
/// let executor = Executor::work_stealing(4, 2).unwrap();
///
/// let futures: Vec<_> = (0..10)
///     .map(|i| executor.submit(move || i * i).unwrap())
///     .collect();
///
/// let sum: u64 = futures.iter().map(|f| *f.get()).sum();
/// assert_eq!(sum, 285);
///
/// executor.shutdown();
/// ```
pub struct Executor {
    /// State shared with the workers.
    core: Arc<Core>,

    /// Join handles of the worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Returns a builder with the default configuration.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    /// Starts `capacity` workers using the work-stealing policy.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of worker threads
    /// * `threshold` - How many tasks a worker may hold after pulling
    ///   from the global queue
    pub fn work_stealing(capacity: usize, threshold: usize) -> Result<Self> {
        ExecutorBuilder::new()
            .capacity(capacity)
            .threshold(threshold)
            .strategy(Strategy::WorkStealing)
            .build()
    }

    /// Starts `capacity` workers using the work-balancing policy.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of worker threads
    /// * `threshold` - How many tasks a worker may hold after pulling
    ///   from the global queue
    /// * `threshold_balance` - Minimum size difference between two
    ///   deques before a rebalancing pass moves tasks
    pub fn work_balancing(
        capacity: usize,
        threshold: usize,
        threshold_balance: usize,
    ) -> Result<Self> {
        ExecutorBuilder::new()
            .capacity(capacity)
            .threshold(threshold)
            .strategy(Strategy::WorkBalancing { threshold_balance })
            .build()
    }

    /// Validates `config` and spawns one worker per capacity slot.
    pub(crate) fn with_config(config: ExecutorConfig) -> Result<Self> {
        config.validate()?;

        let policy = distribution(config.strategy);
        let core = Arc::new(Core::new(config));

        let mut executor = Self {
            core: core.clone(),
            handles: Vec::with_capacity(core.capacity()),
        };

        for id in 0..core.capacity() {
            let worker = Worker::new(id, core.clone(), policy.clone());

            core.worker_started();
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", core.config.thread_name, id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => executor.handles.push(handle),
                Err(err) => {
                    core.worker_exited();
                    // Dropping the partial executor stops the workers already running.
                    return Err(ExecutorError::Spawn(err));
                }
            }
        }

        info!(
            capacity = core.capacity(),
            threshold = core.config.threshold,
            strategy = ?core.config.strategy,
            "executor started"
        );

        Ok(executor)
    }

    /// Submits a value-producing task.
    ///
    /// The task is pushed to the global queue and becomes eligible for
    /// execution right away; this call never blocks on the task.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::ShutDown`] if [`shutdown`](Self::shutdown)
    /// was already called. The task is not run in that case.
    pub fn submit<C: Callable>(&self, task: C) -> Result<TaskFuture<C::Output>> {
        let (record, future) = TaskRecord::callable(self.core.next_task_id(), task);
        self.enqueue(record)?;
        Ok(future)
    }

    /// Submits a task that produces no value.
    ///
    /// The returned future resolves to `()` once the task has run.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::ShutDown`] if [`shutdown`](Self::shutdown)
    /// was already called.
    pub fn execute<R: Runnable>(&self, task: R) -> Result<TaskFuture<()>> {
        let (record, future) = TaskRecord::runnable(self.core.next_task_id(), task);
        self.enqueue(record)?;
        Ok(future)
    }

    fn enqueue(&self, record: TaskRecord) -> Result<()> {
        if let Err(record) = self.core.injector.push(record) {
            warn!(task = record.id(), "rejected task submitted after shutdown");
            return Err(ExecutorError::ShutDown);
        }

        self.core.stats.record_submitted();
        Ok(())
    }

    /// Signals the workers to exit once they run out of work.
    ///
    /// This does not block and does not interrupt running tasks. Tasks
    /// accepted before the call still run; new submissions are rejected.
    /// Calling it more than once is harmless.
    pub fn shutdown(&self) {
        if !self.core.injector.is_shutdown() {
            info!("executor shutting down");
        }
        self.core.injector.shutdown();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.core.injector.is_shutdown()
    }

    /// Waits for every worker thread to exit.
    ///
    /// Workers only exit after [`shutdown`](Self::shutdown), so calling
    /// this first blocks until some other thread shuts the executor down.
    pub fn join(&mut self) {
        let current = thread::current().id();

        for handle in self.handles.drain(..) {
            // A task holding the last reference may drop the executor on a worker.
            if handle.thread().id() == current {
                continue;
            }
            let _ = handle.join();
        }
    }

    /// Returns a snapshot of the scheduling counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.core.stats.snapshot()
    }

    /// Number of worker threads that have not exited yet.
    pub fn live_workers(&self) -> usize {
        self.core.live_workers()
    }

    /// Number of tasks waiting in the global queue or in a local deque.
    pub fn queued(&self) -> usize {
        self.core.queued()
    }

    /// Number of worker threads the executor was built with.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// The configuration the executor was built with.
    pub fn config(&self) -> &ExecutorConfig {
        &self.core.config
    }
}

impl Drop for Executor {
    /// Shuts down the executor and joins its workers.
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.core.config)
            .field("live_workers", &self.live_workers())
            .field("queued", &self.queued())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
