//! Error types for dispatch queue operations

use super::task::TaskId;
use std::time::Duration;
use thiserror::Error;

/// Errors from queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Submit or status against a channel that was never registered.
    #[error("channel '{name}' is not registered")]
    UnknownChannel { name: String },

    /// A channel name can be registered only once.
    #[error("channel '{name}' is already registered")]
    ChannelExists { name: String },

    /// Channel concurrency must be a positive integer.
    #[error("channel '{name}' concurrency must be positive")]
    InvalidConcurrency { name: String },

    /// The task id is unknown to this queue.
    #[error("task {id} not found")]
    TaskNotFound { id: TaskId },

    /// `await_result` gave up waiting. The task itself is unaffected and
    /// may still complete later.
    #[error("task {id} did not complete within {timeout:?}")]
    Timeout { id: TaskId, timeout: Duration },

    /// The task exhausted its retry budget.
    #[error("task {id} failed after {attempts} attempts: {error}")]
    TaskFailed {
        id: TaskId,
        attempts: u32,
        error: String,
    },

    /// The awaited task was cancelled before it started.
    #[error("task {id} was cancelled")]
    Cancelled { id: TaskId },

    /// Only pending tasks can be cancelled.
    #[error("task {id} is not pending and cannot be cancelled")]
    NotCancellable { id: TaskId },
}
