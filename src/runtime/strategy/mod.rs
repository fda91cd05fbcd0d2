//! Load-distribution policies.
//!
//! Both policies share the same worker loop, global intake and drain
//! phase. They differ in two hooks:
//! - what a worker does when its own deque and the global queue are empty,
//! - what it does after each completed task.
//!
//! [`stealing`] reacts to idleness by stealing a single task from a peer.
//! [`balancing`] additionally runs randomized rebalancing passes that
//! equalize two deques in bulk.

pub(crate) mod balancing;
pub(crate) mod stealing;

use crate::runtime::builder::Strategy;
use crate::runtime::executor::core::Core;

use std::sync::Arc;

/// Decision taken by an idle worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Idle {
    /// The worker's deque received work; go drain it.
    Found,

    /// Shutdown was requested and nothing is left for this worker.
    Exit,

    /// Nothing to do yet; wait for a bounded, randomized interval.
    Wait,
}

/// Hooks a scheduling policy plugs into the worker loop.
pub(crate) trait Distribution: Send + Sync {
    /// Called when worker `id` found both its deque and the global
    /// queue empty after an acquisition round.
    fn on_idle(&self, core: &Core, id: usize) -> Idle;

    /// Called after worker `id` finished executing a task.
    fn after_task(&self, _core: &Core, _id: usize) {}
}

/// Instantiates the policy selected in the configuration.
pub(crate) fn distribution(strategy: Strategy) -> Arc<dyn Distribution> {
    match strategy {
        Strategy::WorkStealing => Arc::new(stealing::WorkStealing),
        Strategy::WorkBalancing { threshold_balance } => {
            Arc::new(balancing::WorkBalancing::new(threshold_balance))
        }
    }
}
