use super::stealing::steal_one;
use super::{Distribution, Idle};
use crate::runtime::executor::core::Core;
use crate::runtime::queue::deque::Deque;

use rand::Rng;
use tracing::debug;

/// Randomized work-balancing.
///
/// After every completed task a worker holding `n` tasks starts a
/// rebalancing pass with probability `1 / (n + 1)`, so lightly loaded
/// workers rebalance more often. A pass picks a uniformly random peer
/// and, if the two deques differ by more than `threshold_balance`,
/// moves tasks from the longer one to the shorter one until they are
/// even.
pub(crate) struct WorkBalancing {
    threshold_balance: usize,
}

impl WorkBalancing {
    pub(crate) fn new(threshold_balance: usize) -> Self {
        Self { threshold_balance }
    }

    /// Runs one rebalancing pass between worker `id` and `victim`.
    fn rebalance(&self, core: &Core, id: usize, victim: usize) {
        if victim == id || core.is_retired(victim) {
            return;
        }

        let moved = balance(&core.locals[id], &core.locals[victim], self.threshold_balance);
        if moved > 0 {
            core.stats.record_rebalance(moved);
            debug!(victim, moved, "rebalanced deques");
        }

        // The victim may have retired while receiving tasks.
        if core.is_retired(victim) {
            let reclaimed = core.reclaim(victim, id);
            if reclaimed > 0 {
                debug!(victim, reclaimed, "took tasks back from retired worker");
            }
        }
    }
}

impl Distribution for WorkBalancing {
    /// A worker with no work of its own exits as soon as shutdown is
    /// requested and the global queue is empty, without looking at its
    /// peers. Otherwise it takes a single task from the first peer that
    /// has one, like the work-stealing policy does.
    fn on_idle(&self, core: &Core, id: usize) -> Idle {
        if core.injector.is_drained() {
            return Idle::Exit;
        }

        if steal_one(core, id).is_some() {
            Idle::Found
        } else {
            Idle::Wait
        }
    }

    fn after_task(&self, core: &Core, id: usize) {
        let mut rng = rand::thread_rng();

        if !should_rebalance(&mut rng, core.locals[id].len()) {
            return;
        }

        let victim = rng.gen_range(0..core.capacity());
        self.rebalance(core, id, victim);
    }
}

/// Draws uniformly from `0..=len` and fires when the draw hits `len`.
pub(crate) fn should_rebalance<R: Rng + ?Sized>(rng: &mut R, len: usize) -> bool {
    rng.gen_range(0..=len) == len
}

/// Evens out two deques whose sizes differ by more than `threshold_balance`.
///
/// Items are moved one at a time from the top of the longer deque to the
/// bottom of the shorter one, until the sizes observed at the start are
/// within one of each other. Either deque may be the donor. The number
/// of moves is fixed up front, so the pass terminates even if the
/// owners keep pushing and popping concurrently.
///
/// Returns the number of items moved.
///
/// # Examples
///
/// ```
/// use workpool::{Deque, balance};
///
/// let busy = Deque::new();
/// let idle = Deque::new();
/// for i in 0..9 {
///     busy.push_bottom(i);
/// }
///
/// assert_eq!(balance(&busy, &idle, 2), 4);
/// assert_eq!((busy.len(), idle.len()), (5, 4));
///
/// // The oldest items went to the idle deque.
/// assert_eq!(idle.pop_top(), Some(0));
/// ```
pub fn balance<T>(a: &Deque<T>, b: &Deque<T>, threshold_balance: usize) -> usize {
    let (len_a, len_b) = (a.len(), b.len());

    let (donor, recipient, diff) = if len_a >= len_b {
        (a, b, len_a - len_b)
    } else {
        (b, a, len_b - len_a)
    };

    if diff <= threshold_balance {
        return 0;
    }

    let mut moved = 0;
    for _ in 0..diff / 2 {
        match donor.pop_top() {
            Some(item) => {
                recipient.push_bottom(item);
                moved += 1;
            }
            None => break,
        }
    }

    moved
}
