use super::deque::Deque;
use crate::runtime::task::TaskRecord;

use parking_lot::Condvar;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global intake queue shared by all workers.
///
/// Submitters push task records at the bottom; workers move them into
/// their local deques, also from the bottom, under the queue's lock.
///
/// The injector also owns the shutdown flag and the condition variable
/// idle workers wait on. The flag is written while the queue lock is
/// held, so "shut down and empty" is a stable observation: no record
/// can be accepted after a worker has seen it.
pub(crate) struct Injector {
    /// Records waiting to be acquired by a worker.
    queue: Deque<TaskRecord>,

    /// Wakes idle workers on new submissions and on shutdown.
    condvar: Condvar,

    /// Set once by [`shutdown`](Self::shutdown).
    shutdown: AtomicBool,
}

impl Injector {
    /// Creates an empty injector.
    pub(crate) fn new() -> Self {
        Self {
            queue: Deque::new(),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Pushes a record at the bottom of the global queue and wakes
    /// idle workers.
    ///
    /// Returns the record back if the executor is already shut down.
    pub(crate) fn push(&self, task: TaskRecord) -> Result<(), TaskRecord> {
        let mut queue = self.queue.lock();
        if self.shutdown.load(Ordering::Acquire) {
            return Err(task);
        }
        queue.push_back(task);
        drop(queue);

        self.condvar.notify_all();
        Ok(())
    }

    /// Signals shutdown and wakes all idle workers.
    pub(crate) fn shutdown(&self) {
        let queue = self.queue.lock();
        self.shutdown.store(true, Ordering::Release);
        drop(queue);

        self.condvar.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` once shutdown was requested and no record is left.
    pub(crate) fn is_drained(&self) -> bool {
        let queue = self.queue.lock();
        queue.is_empty() && self.shutdown.load(Ordering::Acquire)
    }

    /// Moves records from the global queue into `local` until either the
    /// global queue is empty or `local` holds `threshold` records.
    ///
    /// Each record is moved under its own acquisition of the global lock
    /// so that concurrent workers interleave their acquisitions.
    ///
    /// Returns the number of records moved.
    pub(crate) fn acquire(&self, local: &Deque<TaskRecord>, threshold: usize) -> usize {
        let mut moved = 0;

        loop {
            let mut queue = self.queue.lock();
            if queue.is_empty() || local.len() >= threshold {
                break;
            }

            if let Some(task) = queue.pop_back() {
                local.push_bottom(task);
                moved += 1;
            }
        }

        moved
    }

    /// Parks the calling worker for at most `timeout`.
    ///
    /// Returns immediately if the queue holds work or shutdown was
    /// requested; otherwise a push or a shutdown ends the wait early.
    pub(crate) fn park(&self, timeout: Duration) {
        let mut queue = self.queue.lock();
        if !queue.is_empty() || self.shutdown.load(Ordering::Acquire) {
            return;
        }

        let _ = self.condvar.wait_for(&mut queue, timeout);
    }
}
