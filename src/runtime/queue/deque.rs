use parking_lot::{Mutex, MutexGuard};

use std::collections::VecDeque;
use std::fmt;

/// A thread-safe double-ended queue with a "top" and a "bottom" end.
///
/// Every worker owns one `Deque`: it pushes and pops its own work at
/// the bottom (LIFO), while other workers remove work from the top
/// (oldest first) when stealing or rebalancing.
///
/// All operations take the same lock, so the two ends never race with
/// each other. Sizes returned by [`len`](Self::len) and
/// [`is_empty`](Self::is_empty) are snapshots and may be stale by the
/// time the caller acts on them.
///
/// Moving an item from one deque to another is never atomic across the
/// two queues: the item is popped under the first lock, which is then
/// released before the second lock is taken.
///
/// # Examples
///
/// ```
/// use workpool::Deque;
///
/// let deque = Deque::new();
/// deque.push_bottom('a');
/// deque.push_bottom('b');
/// deque.push_bottom('c');
///
/// assert_eq!(deque.pop_top(), Some('a'));
/// assert_eq!(deque.pop_bottom(), Some('c'));
/// assert_eq!(deque.len(), 1);
/// ```
pub struct Deque<T> {
    /// Items ordered from top (front) to bottom (back).
    inner: Mutex<VecDeque<T>>,
}

impl<T> Deque<T> {
    /// Creates an empty deque.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an item at the bottom end.
    pub fn push_bottom(&self, item: T) {
        self.inner.lock().push_back(item);
    }

    /// Removes the bottom-most (most recently pushed) item.
    ///
    /// Returns `None` if the deque is empty.
    pub fn pop_bottom(&self) -> Option<T> {
        self.inner.lock().pop_back()
    }

    /// Removes the top-most (oldest) item.
    ///
    /// Used by other workers for theft and rebalancing.
    /// Returns `None` if the deque is empty.
    pub fn pop_top(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    /// Returns `true` if the deque held no items at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the number of items at the time of the call.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Locks the deque for a compound operation.
    ///
    /// The guard exposes the raw storage, top at the front and bottom
    /// at the back.
    pub(crate) fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.lock()
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deque").field("len", &self.len()).finish()
    }
}
