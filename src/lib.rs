//! # workpool
//!
//! **workpool** runs an unbounded stream of submitted tasks on a fixed
//! pool of worker threads. Every worker owns a locked double-ended
//! queue; submissions land in a shared global queue from which workers
//! pull batches bounded by a threshold.
//!
//! Two load-distribution policies are available:
//!
//! - **Work-stealing**: a worker that runs dry takes one task from the
//!   top of a peer's deque, visiting peers in round-robin order.
//! - **Work-balancing**: after each task a worker may, with a
//!   probability that falls as its own deque grows, pick a random peer
//!   and even out the two deques in bulk.
//!
//! Submitting never blocks. Each submission returns a [`TaskFuture`]
//! whose [`get`](TaskFuture::get) blocks until a worker has run the task.
//! Results arrive in no particular order.
//!
//! ## Quick Start
//!
//! ```rust
//! use workpool::Executor;
//!
//! let executor = Executor::work_balancing(4, 2, 1).unwrap();
//!
//! let futures: Vec<_> = (0..8)
//!     .map(|i| executor.submit(move || i * 10).unwrap())
//!     .collect();
//!
//! for (i, future) in futures.iter().enumerate() {
//!     assert_eq!(*future.get(), i * 10);
//! }
//!
//! executor.shutdown();
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (worker lifecycle, thefts,
//! rebalancing passes, task panics) and installs no subscriber.

mod error;
mod runtime;

pub use error::{ExecutorError, Result};
pub use runtime::builder::{ExecutorBuilder, ExecutorConfig, Strategy};
pub use runtime::context::current_worker;
pub use runtime::stats::StatsSnapshot;
pub use runtime::task::{Callable, Runnable, TaskFuture};
pub use runtime::{Deque, Executor, balance};
