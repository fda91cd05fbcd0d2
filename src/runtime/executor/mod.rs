//! Executor internals.
//!
//! - [`core`]: state shared by the executor handle and all workers,
//! - [`worker`]: the per-thread scheduling loop.

pub(crate) mod core;
pub(crate) mod worker;
