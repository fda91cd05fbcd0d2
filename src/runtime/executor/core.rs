use crate::runtime::builder::ExecutorConfig;
use crate::runtime::queue::deque::Deque;
use crate::runtime::queue::injector::Injector;
use crate::runtime::stats::Stats;
use crate::runtime::task::TaskRecord;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// State shared by the executor handle and every worker.
///
/// The core owns:
/// - the global injector (intake queue and shutdown flag),
/// - one local deque per worker, indexed by worker id,
/// - per-worker retirement marks used by the exit protocol,
/// - scheduling counters.
pub(crate) struct Core {
    /// Settings the executor was built with.
    pub(crate) config: ExecutorConfig,

    /// Global intake queue.
    pub(crate) injector: Injector,

    /// Local deques, one per worker.
    pub(crate) locals: Vec<Deque<TaskRecord>>,

    /// Set by a worker that is about to exit.
    retired: Vec<AtomicBool>,

    /// Scheduling counters.
    pub(crate) stats: Stats,

    /// Number of worker threads that have not exited yet.
    live: AtomicUsize,

    /// Next task identifier.
    next_id: AtomicU64,
}

impl Core {
    pub(crate) fn new(config: ExecutorConfig) -> Self {
        let capacity = config.capacity;

        Self {
            config,
            injector: Injector::new(),
            locals: (0..capacity).map(|_| Deque::new()).collect(),
            retired: (0..capacity).map(|_| AtomicBool::new(false)).collect(),
            stats: Stats::default(),
            live: AtomicUsize::new(0),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.locals.len()
    }

    pub(crate) fn next_task_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Records that are queued but not yet picked for execution.
    pub(crate) fn queued(&self) -> usize {
        self.injector.len() + self.locals.iter().map(Deque::len).sum::<usize>()
    }

    pub(crate) fn live_workers(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub(crate) fn worker_started(&self) {
        self.live.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn worker_exited(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    /// Returns `true` if worker `id` has committed to exiting.
    pub(crate) fn is_retired(&self, id: usize) -> bool {
        self.retired[id].load(Ordering::SeqCst)
    }

    /// Attempts to retire worker `id`.
    ///
    /// The mark is published before the deque is re-checked. A peer that
    /// pushes into the deque afterwards observes the mark and takes its
    /// records back, so a retired worker never strands work. If records
    /// arrived before the check, the mark is withdrawn and `false` is
    /// returned.
    pub(crate) fn retire(&self, id: usize) -> bool {
        self.retired[id].store(true, Ordering::SeqCst);

        if self.locals[id].is_empty() {
            return true;
        }

        self.retired[id].store(false, Ordering::SeqCst);
        false
    }

    /// Moves every record left in `from`'s deque into `to`'s deque.
    pub(crate) fn reclaim(&self, from: usize, to: usize) -> usize {
        let mut moved = 0;
        while let Some(task) = self.locals[from].pop_top() {
            self.locals[to].push_bottom(task);
            moved += 1;
        }
        moved
    }
}
