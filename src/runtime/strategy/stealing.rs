use super::{Distribution, Idle};
use crate::runtime::executor::core::Core;

use tracing::debug;

/// Reactive work-stealing.
///
/// A worker with nothing to do takes one task from the top of the first
/// peer deque that has work, scanning peers in round-robin order starting
/// right after itself. It exits only when no peer yields a task and the
/// executor is shut down with an empty global queue.
pub(crate) struct WorkStealing;

impl Distribution for WorkStealing {
    fn on_idle(&self, core: &Core, id: usize) -> Idle {
        if steal_one(core, id).is_some() {
            return Idle::Found;
        }

        if core.injector.is_drained() {
            Idle::Exit
        } else {
            Idle::Wait
        }
    }
}

/// Moves one task from the top of a peer's deque to the bottom of
/// `thief`'s deque.
///
/// Peers are visited starting at `thief + 1`, wrapping around, so thefts
/// spread over all workers instead of always hitting worker 0. Only the
/// victim's lock is held while popping; the push happens after it is
/// released.
///
/// Returns the victim's index.
pub(crate) fn steal_one(core: &Core, thief: usize) -> Option<usize> {
    let capacity = core.capacity();

    for offset in 1..capacity {
        let victim = (thief + offset) % capacity;

        if let Some(task) = core.locals[victim].pop_top() {
            debug!(victim, task = task.id(), "stole task");
            core.locals[thief].push_bottom(task);
            core.stats.record_stolen();
            return Some(victim);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::builder::ExecutorConfig;
    use crate::runtime::task::TaskRecord;

    fn core(capacity: usize) -> Core {
        Core::new(ExecutorConfig {
            capacity,
            ..ExecutorConfig::default()
        })
    }

    fn push(core: &Core, worker: usize, id: u64) {
        core.locals[worker].push_bottom(TaskRecord::callable(id, move || id).0);
    }

    #[test]
    fn test_steal_scans_from_successor() {
        let core = core(4);
        push(&core, 0, 10);
        push(&core, 3, 30);

        // Worker 1 visits 2, 3, then 0.
        assert_eq!(steal_one(&core, 1), Some(3));
        assert_eq!(core.locals[1].len(), 1);
        assert!(core.locals[3].is_empty());
    }

    #[test]
    fn test_steal_wraps_around() {
        let core = core(4);
        push(&core, 0, 10);

        assert_eq!(steal_one(&core, 3), Some(0));
    }

    #[test]
    fn test_steal_takes_one_task_from_the_top() {
        let core = core(2);
        for id in 0..3 {
            push(&core, 0, id);
        }

        assert_eq!(steal_one(&core, 1), Some(0));
        assert_eq!(core.locals[1].pop_bottom().map(|t| t.id()), Some(0));
        assert_eq!(core.locals[0].len(), 2);
        assert_eq!(core.stats.snapshot().stolen, 1);
    }

    #[test]
    fn test_single_worker_has_no_victims() {
        let core = core(1);
        assert_eq!(steal_one(&core, 0), None);
    }

    #[test]
    fn test_idle_worker_waits_until_shutdown() {
        let core = core(2);
        assert_eq!(WorkStealing.on_idle(&core, 0), Idle::Wait);

        core.injector.shutdown();
        assert_eq!(WorkStealing.on_idle(&core, 0), Idle::Exit);
    }

    #[test]
    fn test_idle_worker_steals_before_exiting() {
        let core = core(2);
        push(&core, 1, 5);
        core.injector.shutdown();

        assert_eq!(WorkStealing.on_idle(&core, 0), Idle::Found);
        assert_eq!(core.locals[0].len(), 1);
    }
}
