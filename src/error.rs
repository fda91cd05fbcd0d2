use thiserror::Error;

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Errors reported by the executor.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The builder was given a value the executor cannot run with.
    #[error("invalid executor configuration: {0}")]
    InvalidConfig(String),

    /// A task was submitted after [`Executor::shutdown`](crate::Executor::shutdown).
    #[error("executor has been shut down")]
    ShutDown,

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The task body panicked before publishing a value.
    #[error("task {task} panicked: {message}")]
    TaskPanicked { task: u64, message: String },

    /// The task was discarded without ever being executed.
    #[error("task {task} was dropped before it ran")]
    TaskDropped { task: u64 },
}

impl ExecutorError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns `true` if the error was caused by a panicking task.
    pub fn is_task_panic(&self) -> bool {
        matches!(self, Self::TaskPanicked { .. })
    }
}
