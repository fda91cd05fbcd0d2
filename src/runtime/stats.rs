use std::sync::atomic::{AtomicU64, Ordering};

/// Live scheduling counters shared by the executor and its workers.
#[derive(Debug, Default)]
pub(crate) struct Stats {
    submitted: AtomicU64,
    executed: AtomicU64,
    panicked: AtomicU64,
    acquired: AtomicU64,
    stolen: AtomicU64,
    rebalances: AtomicU64,
    rebalanced: AtomicU64,
}

impl Stats {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self, panicked: bool) {
        self.executed.fetch_add(1, Ordering::Relaxed);
        if panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_acquired(&self, n: usize) {
        self.acquired.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_stolen(&self) {
        self.stolen.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rebalance(&self, moved: usize) {
        self.rebalances.fetch_add(1, Ordering::Relaxed);
        self.rebalanced.fetch_add(moved as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            acquired: self.acquired.load(Ordering::Relaxed),
            stolen: self.stolen.load(Ordering::Relaxed),
            rebalances: self.rebalances.load(Ordering::Relaxed),
            rebalanced: self.rebalanced.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the executor's scheduling counters.
///
/// Counters are updated with relaxed ordering, so a snapshot taken while
/// workers are running is approximate. After
/// [`Executor::join`](crate::Executor::join) it is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Tasks accepted by `submit` or `execute`.
    pub submitted: u64,

    /// Tasks run to completion, including those that panicked.
    pub executed: u64,

    /// Tasks whose body panicked.
    pub panicked: u64,

    /// Records moved from the global queue into a local deque.
    pub acquired: u64,

    /// Records taken from the top of a peer's deque by an idle worker.
    pub stolen: u64,

    /// Rebalancing passes that moved at least one record.
    pub rebalances: u64,

    /// Records moved by rebalancing passes.
    pub rebalanced: u64,
}

impl StatsSnapshot {
    /// Tasks accepted but not yet finished.
    pub fn pending(&self) -> u64 {
        self.submitted.saturating_sub(self.executed)
    }
}
