use super::future::{TaskFuture, channel};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// A unit of work that produces no value.
///
/// Submitted with [`Executor::execute`](crate::Executor::execute); the
/// returned future resolves to `()` once [`run`](Self::run) has returned.
pub trait Runnable: Send + 'static {
    /// Executes the task. Called exactly once, on a worker thread.
    fn run(self);
}

/// A unit of work that produces a single value.
///
/// Every `FnOnce() -> T` closure that can be sent to another thread is
/// a `Callable`, so most callers never implement this trait by hand.
///
/// The output must be `Sync` because every clone of the returned
/// [`TaskFuture`] reads the same retained value.
pub trait Callable: Send + 'static {
    /// The value published to the task's future.
    type Output: Send + Sync + 'static;

    /// Executes the task. Called exactly once, on a worker thread.
    fn call(self) -> Self::Output;
}

impl<F, T> Callable for F
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;

    fn call(self) -> T {
        self()
    }
}

/// Type-erased body of a task record. Returns the panic message if the
/// task panicked.
type Job = Box<dyn FnOnce() -> Result<(), String> + Send>;

/// A submitted task paired with the write side of its future.
///
/// A record is created once per submission and moves between queues by
/// value, so it can only ever live in one deque and run once.
pub(crate) struct TaskRecord {
    /// Monotonic identifier assigned at submission.
    id: u64,

    /// The task and its promise, erased behind a single closure.
    job: Job,
}

impl TaskRecord {
    /// Wraps a callable together with a fresh future.
    pub(crate) fn callable<C: Callable>(id: u64, task: C) -> (Self, TaskFuture<C::Output>) {
        let (promise, future) = channel(id);

        let job: Job = Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(move || task.call())) {
                Ok(value) => {
                    promise.fulfill(value);
                    Ok(())
                }
                Err(payload) => {
                    let message = panic_message(&*payload);
                    promise.fail(message.clone());
                    Err(message)
                }
            }
        });

        (Self { id, job }, future)
    }

    /// Wraps a runnable; its future resolves to `()`.
    pub(crate) fn runnable<R: Runnable>(id: u64, task: R) -> (Self, TaskFuture<()>) {
        Self::callable(id, move || task.run())
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Executes the task and publishes its outcome to the future.
    ///
    /// Panics raised by the task are caught here so that they never
    /// unwind through a worker loop.
    pub(crate) fn run(self) -> Result<(), String> {
        (self.job)()
    }
}

impl fmt::Debug for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRecord").field("id", &self.id).finish()
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Count(Arc<AtomicUsize>);

    impl Runnable for Count {
        fn run(self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_callable_record_publishes_value() {
        let (record, future) = TaskRecord::callable(1, || 6 * 7);
        assert_eq!(record.id(), 1);

        assert!(record.run().is_ok());
        assert_eq!(*future.get(), 42);
    }

    #[test]
    fn test_runnable_record_resolves_to_unit() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (record, future) = TaskRecord::runnable(2, Count(counter.clone()));

        assert!(record.run().is_ok());
        assert!(future.result().is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_is_captured() {
        let (record, future) = TaskRecord::callable(3, || -> u32 { panic!("exploded") });

        assert_eq!(record.run(), Err("exploded".to_string()));
        assert!(future.result().unwrap_err().is_task_panic());
    }

    #[test]
    fn test_formatted_panic_message() {
        let (record, _future) = TaskRecord::callable(4, || -> u32 { panic!("index {}", 12) });

        assert_eq!(record.run(), Err("index 12".to_string()));
    }
}
