use crate::error::{ExecutorError, Result};

use parking_lot::{Condvar, Mutex};

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Final state of a task, published exactly once.
enum Outcome<T> {
    /// The task returned normally.
    Value(T),

    /// The task body panicked; the payload message is kept for readers.
    Panicked(String),

    /// The task record was dropped without ever being executed.
    Dropped,
}

/// Single-assignment slot shared by a [`TaskFuture`] and its [`Promise`].
struct Slot<T> {
    /// The published outcome. Written once by the promise.
    outcome: OnceLock<Outcome<T>>,

    /// Lock paired with `ready` so that readers cannot miss the wake-up.
    lock: Mutex<()>,

    /// Signalled once the outcome has been published.
    ready: Condvar,
}

/// A handle to the eventual result of a submitted task.
///
/// `TaskFuture` is returned by [`Executor::submit`](crate::Executor::submit)
/// without blocking. Reading it with [`get`](Self::get) blocks the calling
/// thread until the worker that executed the task publishes the value.
///
/// The value is retained once published: repeated reads return
/// immediately, and clones of the handle all observe the same value.
///
/// There is no cancellation and no timeout on [`get`](Self::get). A
/// future whose task never runs blocks its readers forever.
pub struct TaskFuture<T> {
    /// Identifier of the task that will fill this future.
    id: u64,

    /// Shared result slot.
    slot: Arc<Slot<T>>,
}

/// The write side of a [`TaskFuture`].
///
/// Owned by the task record and consumed by the worker that executes
/// the task. Dropping an unfulfilled promise releases every reader with
/// a "dropped" outcome instead of blocking them forever.
pub(crate) struct Promise<T> {
    slot: Option<Arc<Slot<T>>>,
}

/// Creates a connected promise/future pair for task `id`.
pub(crate) fn channel<T>(id: u64) -> (Promise<T>, TaskFuture<T>) {
    let slot = Arc::new(Slot {
        outcome: OnceLock::new(),
        lock: Mutex::new(()),
        ready: Condvar::new(),
    });

    (
        Promise {
            slot: Some(slot.clone()),
        },
        TaskFuture { id, slot },
    )
}

impl<T> Promise<T> {
    /// Publishes the value produced by the task.
    pub(crate) fn fulfill(mut self, value: T) {
        self.publish(Outcome::Value(value));
    }

    /// Publishes a panic raised by the task body.
    pub(crate) fn fail(mut self, message: String) {
        self.publish(Outcome::Panicked(message));
    }

    fn publish(&mut self, outcome: Outcome<T>) {
        let Some(slot) = self.slot.take() else {
            return;
        };

        // A slot has exactly one promise, so the cell is still empty.
        let _ = slot.outcome.set(outcome);

        let _guard = slot.lock.lock();
        slot.ready.notify_all();
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        self.publish(Outcome::Dropped);
    }
}

impl<T> TaskFuture<T> {
    /// Returns the identifier of the task behind this future.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns `true` once the task has finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.slot.outcome.get().is_some()
    }

    /// Blocks until the task has run, then returns its value.
    ///
    /// # Panics
    ///
    /// Panics if the task itself panicked or was dropped without running.
    /// Use [`result`](Self::result) to observe those cases as errors.
    pub fn get(&self) -> &T {
        match self.result() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Blocks until the task has run and returns its outcome.
    pub fn result(&self) -> Result<&T> {
        self.outcome_to_result(self.wait())
    }

    /// Returns the value if the task has already finished, without blocking.
    ///
    /// Returns `None` while the task is pending.
    pub fn try_get(&self) -> Option<Result<&T>> {
        self.slot
            .outcome
            .get()
            .map(|outcome| self.outcome_to_result(outcome))
    }

    /// Blocks for at most `timeout` waiting for the task to finish.
    ///
    /// Returns `None` if the task is still pending when the timeout
    /// elapses.
    pub fn get_timeout(&self, timeout: Duration) -> Option<Result<&T>> {
        if let Some(outcome) = self.slot.outcome.get() {
            return Some(self.outcome_to_result(outcome));
        }

        let mut guard = self.slot.lock.lock();
        loop {
            if let Some(outcome) = self.slot.outcome.get() {
                return Some(self.outcome_to_result(outcome));
            }

            if self.slot.ready.wait_for(&mut guard, timeout).timed_out() {
                return self
                    .slot
                    .outcome
                    .get()
                    .map(|outcome| self.outcome_to_result(outcome));
            }
        }
    }

    fn wait(&self) -> &Outcome<T> {
        if let Some(outcome) = self.slot.outcome.get() {
            return outcome;
        }

        let mut guard = self.slot.lock.lock();
        loop {
            // Checked under the lock: the promise notifies while holding it.
            if let Some(outcome) = self.slot.outcome.get() {
                return outcome;
            }
            self.slot.ready.wait(&mut guard);
        }
    }

    fn outcome_to_result<'a>(&self, outcome: &'a Outcome<T>) -> Result<&'a T> {
        match outcome {
            Outcome::Value(value) => Ok(value),
            Outcome::Panicked(message) => Err(ExecutorError::TaskPanicked {
                task: self.id,
                message: message.clone(),
            }),
            Outcome::Dropped => Err(ExecutorError::TaskDropped { task: self.id }),
        }
    }
}

impl<T> Clone for TaskFuture<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            slot: self.slot.clone(),
        }
    }
}

impl<T> fmt::Debug for TaskFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFuture")
            .field("id", &self.id)
            .field("ready", &self.is_ready())
            .finish()
    }
}
