use crate::runtime::builder::MIN_BACKOFF;
use crate::runtime::context::enter_worker;
use crate::runtime::executor::core::Core;
use crate::runtime::strategy::{Distribution, Idle};

use rand::Rng;
use tracing::{error, info, info_span, trace};

use std::sync::Arc;
use std::time::Duration;

/// A worker thread of the executor.
///
/// Each worker owns the local deque at its index in the core. Its loop is:
/// 1. Pull records from the global queue until the deque holds `threshold`
/// 2. If still empty, ask the policy: take work from a peer, exit, or wait
/// 3. Drain the deque from the bottom, running the policy's hook after
///    each task
pub(crate) struct Worker {
    /// Index of this worker and of its local deque.
    id: usize,

    /// State shared with the executor and the other workers.
    core: Arc<Core>,

    /// Load-distribution policy.
    distribution: Arc<dyn Distribution>,
}

impl Worker {
    pub(crate) fn new(id: usize, core: Arc<Core>, distribution: Arc<dyn Distribution>) -> Self {
        Self {
            id,
            core,
            distribution,
        }
    }

    /// Runs the worker loop until shutdown leaves nothing to execute.
    pub(crate) fn run(self) {
        let span = info_span!("worker", id = self.id);
        let _enter = span.enter();

        enter_worker(self.id);
        info!("worker started");

        loop {
            let acquired = self
                .core
                .injector
                .acquire(&self.core.locals[self.id], self.core.config.threshold);
            if acquired > 0 {
                self.core.stats.record_acquired(acquired);
                trace!(acquired, "acquired tasks from global queue");
            }

            if self.core.locals[self.id].is_empty() {
                match self.distribution.on_idle(&self.core, self.id) {
                    Idle::Found => {}
                    Idle::Exit => {
                        if self.core.retire(self.id) {
                            break;
                        }
                        continue;
                    }
                    Idle::Wait => {
                        self.core.injector.park(self.backoff());
                        continue;
                    }
                }
            }

            self.drain();
        }

        self.core.worker_exited();
        info!("worker exited");
    }

    /// Executes tasks from the bottom of the local deque until it is empty.
    fn drain(&self) {
        while let Some(task) = self.core.locals[self.id].pop_bottom() {
            let task_id = task.id();

            match task.run() {
                Ok(()) => self.core.stats.record_executed(false),
                Err(message) => {
                    error!(task = task_id, %message, "task panicked");
                    self.core.stats.record_executed(true);
                }
            }

            self.distribution.after_task(&self.core, self.id);
        }
    }

    /// Draws the idle wait uniformly from `[1ms, max_backoff]`.
    fn backoff(&self) -> Duration {
        rand::thread_rng().gen_range(MIN_BACKOFF..=self.core.config.max_backoff)
    }
}
