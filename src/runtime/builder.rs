use super::Executor;
use crate::error::{ExecutorError, Result};

use std::thread;
use std::time::Duration;

/// Default number of records a worker pulls from the global queue per round.
pub(crate) const DEFAULT_THRESHOLD: usize = 10;

/// Default upper bound of the randomized idle wait.
pub(crate) const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(300);

/// Lower bound of the randomized idle wait.
pub(crate) const MIN_BACKOFF: Duration = Duration::from_millis(1);

/// Load-distribution policy run by every worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// An idle worker steals one task from the top of the first peer
    /// (in round-robin order) that has work.
    WorkStealing,

    /// After every task a worker may run a rebalancing pass that
    /// equalizes its deque with a random peer's.
    WorkBalancing {
        /// Minimum size difference between two deques before a pass
        /// moves anything.
        threshold_balance: usize,
    },
}

/// Validated executor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of worker threads, and of local deques.
    pub capacity: usize,

    /// Maximum size a worker fills its local deque up to from the
    /// global queue in one acquisition round.
    pub threshold: usize,

    /// Load-distribution policy.
    pub strategy: Strategy,

    /// Upper bound of the randomized wait of an idle worker.
    pub max_backoff: Duration,

    /// Prefix of worker thread names; the worker index is appended.
    pub thread_name: String,
}

impl ExecutorConfig {
    /// Checks that the executor can run with these settings.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ExecutorError::invalid_config("capacity must be > 0"));
        }

        if self.threshold == 0 {
            return Err(ExecutorError::invalid_config("threshold must be > 0"));
        }

        if self.max_backoff < MIN_BACKOFF {
            return Err(ExecutorError::invalid_config(format!(
                "max_backoff must be at least {MIN_BACKOFF:?}"
            )));
        }

        Ok(())
    }
}

impl Default for ExecutorConfig {
    /// One worker per logical CPU, work-stealing, threshold of 10.
    fn default() -> Self {
        let capacity = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            capacity,
            threshold: DEFAULT_THRESHOLD,
            strategy: Strategy::WorkStealing,
            max_backoff: DEFAULT_MAX_BACKOFF,
            thread_name: "workpool-worker".to_string(),
        }
    }
}

/// Builder for configuring and starting an [`Executor`].
///
/// # Examples
///
/// ```
/// use workpool::ExecutorBuilder;
///
/// let executor = ExecutorBuilder::new()
///     .capacity(4)
///     .threshold(2)
///     .work_balancing(3)
///     .build()
///     .unwrap();
///
/// let future = executor.submit(|| 1 + 1).unwrap();
/// assert_eq!(*future.get(), 2);
/// executor.shutdown();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutorBuilder {
    config: ExecutorConfig,
}

impl ExecutorBuilder {
    /// Creates a builder with the default configuration.
    ///
    /// The capacity defaults to the number of available logical CPUs,
    /// falling back to `1` if unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads.
    pub fn capacity(mut self, n: usize) -> Self {
        self.config.capacity = n;
        self
    }

    /// Sets how many records a worker may hold after pulling from the
    /// global queue.
    pub fn threshold(mut self, n: usize) -> Self {
        self.config.threshold = n;
        self
    }

    /// Selects the work-stealing policy.
    pub fn work_stealing(mut self) -> Self {
        self.config.strategy = Strategy::WorkStealing;
        self
    }

    /// Selects the work-balancing policy with the given balance threshold.
    pub fn work_balancing(mut self, threshold_balance: usize) -> Self {
        self.config.strategy = Strategy::WorkBalancing { threshold_balance };
        self
    }

    /// Sets the load-distribution policy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the upper bound of the randomized wait of an idle worker.
    pub fn max_backoff(mut self, max_backoff: Duration) -> Self {
        self.config.max_backoff = max_backoff;
        self
    }

    /// Sets the prefix used to name worker threads.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name = prefix.into();
        self
    }

    /// Validates the configuration and starts the worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::InvalidConfig`] for a zero capacity, a
    /// zero threshold or a backoff below one millisecond, and
    /// [`ExecutorError::Spawn`] if a worker thread cannot be started.
    pub fn build(self) -> Result<Executor> {
        Executor::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExecutorConfig::default();

        assert!(config.capacity >= 1);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.strategy, Strategy::WorkStealing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = ExecutorBuilder::new().capacity(0).build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid executor configuration: capacity must be > 0"
        );
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let err = ExecutorBuilder::new().threshold(0).build().unwrap_err();
        assert!(matches!(err, ExecutorError::InvalidConfig(_)));
    }

    #[test]
    fn test_tiny_backoff_is_rejected() {
        let config = ExecutorConfig {
            max_backoff: Duration::from_micros(10),
            ..ExecutorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_balance_is_allowed() {
        let config = ExecutorConfig {
            strategy: Strategy::WorkBalancing {
                threshold_balance: 0,
            },
            ..ExecutorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let builder = ExecutorBuilder::new()
            .capacity(3)
            .threshold(7)
            .work_balancing(2)
            .max_backoff(Duration::from_millis(50))
            .thread_name("pool");

        assert_eq!(
            builder.config,
            ExecutorConfig {
                capacity: 3,
                threshold: 7,
                strategy: Strategy::WorkBalancing {
                    threshold_balance: 2
                },
                max_backoff: Duration::from_millis(50),
                thread_name: "pool".to_string(),
            }
        );
    }
}
