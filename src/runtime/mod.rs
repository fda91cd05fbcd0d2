//! Core runtime components.
//!
//! This module contains the executor and everything it is built from:
//! - task records and their futures,
//! - the locked deques used as global and per-worker queues,
//! - the worker loop and the two load-distribution policies,
//! - configuration, thread-local worker context and counters.
//!
//! Most users only need [`Executor`] and
//! [`TaskFuture`].

mod core;
mod executor;
mod queue;
mod strategy;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod stats;

pub mod task;

pub use self::core::Executor;
pub use queue::deque::Deque;
pub use strategy::balancing::balance;
