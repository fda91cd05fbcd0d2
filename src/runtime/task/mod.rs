//! Task primitives.
//!
//! This module defines what the executor schedules and how results
//! travel back to the submitter:
//! - [`Runnable`] and [`Callable`], the two kinds of work a client can submit,
//! - the crate-private task record that pairs a task with its result slot,
//! - [`TaskFuture`], the blocking handle returned at submission time.

pub(crate) mod core;
pub(crate) mod future;

pub(crate) use self::core::TaskRecord;

pub use self::core::{Callable, Runnable};
pub use future::TaskFuture;
