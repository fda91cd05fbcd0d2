use std::cell::Cell;

thread_local! {
    /// Index of the worker running on this thread, if any.
    pub(crate) static CURRENT_WORKER_ID: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Installs the worker index for the rest of the current thread's life.
pub(crate) fn enter_worker(id: usize) {
    CURRENT_WORKER_ID.with(|current| current.set(Some(id)));
}

/// Returns the index of the worker executing the current task.
///
/// Returns `None` when called from a thread that is not an executor
/// worker, such as the thread that submitted the task.
///
/// # Examples
///
/// ```
/// use workpool::{Executor, current_worker};
///
/// let executor = Executor::work_stealing(2, 1).unwrap();
/// let worker = executor.submit(current_worker).unwrap();
///
/// assert!(matches!(*worker.get(), Some(id) if id < 2));
/// assert_eq!(current_worker(), None);
/// ```
pub fn current_worker() -> Option<usize> {
    CURRENT_WORKER_ID.with(|current| current.get())
}
