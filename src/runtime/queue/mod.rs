//! Task queues.
//!
//! - [`deque`]: the locked double-ended queue every worker owns,
//! - [`injector`]: the global intake queue submitters push into.

pub(crate) mod deque;
pub(crate) mod injector;
