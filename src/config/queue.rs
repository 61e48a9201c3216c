//! Dispatch queue configuration

use serde::{Deserialize, Serialize};

/// Configuration for the dispatch queue's worker loops.
///
/// Per-channel concurrency is set at channel registration time; this section
/// holds the shared tunables for scheduling and retry budgets.
///
/// # Example
///
/// ```toml
/// [queue]
/// poll_interval_ms = 25
/// await_poll_ms = 25
/// default_max_retries = 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// How often an idle worker loop re-checks its channel for ready work.
    ///
    /// Default: 25ms. The loop also wakes naturally when draining a burst.
    pub poll_interval_ms: u64,

    /// Poll interval used by `await_result` while a task is not yet terminal.
    ///
    /// Default: 25ms. Purely a caller-side sleep; does not affect the task.
    pub await_poll_ms: u64,

    /// Retry budget applied to tasks submitted without an explicit budget.
    ///
    /// Default: 3. A task may therefore run up to `default_max_retries + 1`
    /// times before it is marked failed.
    pub default_max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 25,
            await_poll_ms: 25,
            default_max_retries: 3,
        }
    }
}
