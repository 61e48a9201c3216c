//! Task and priority types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique task identifier.
pub type TaskId = Uuid;

/// Priority level for queued tasks. Higher variants run first; submission
/// order breaks ties within a band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Parse priority from a string. Invalid values default to Normal.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            "critical" => Priority::Critical,
            _ => Priority::Normal,
        }
    }
}

/// Task lifecycle state. Terminal states are final: a task never leaves
/// completed, failed, or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// A unit of work submitted to a channel.
///
/// Owned by the queue; callers see clones. Mutated only by the worker that
/// runs it (and by `cancel` while still pending).
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub channel: String,
    pub command: String,
    pub payload: Value,
    pub priority: Priority,
    pub status: TaskStatus,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub(crate) fn new(
        channel: impl Into<String>,
        command: impl Into<String>,
        payload: Value,
        priority: Priority,
        max_retries: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            command: command.into(),
            payload,
            priority,
            status: TaskStatus::Pending,
            result: None,
            error: None,
            retry_count: 0,
            max_retries,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering_matches_declaration() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn priority_parse_defaults_to_normal() {
        assert_eq!(Priority::parse("HIGH"), Priority::High);
        assert_eq!(Priority::parse(" critical "), Priority::Critical);
        assert_eq!(Priority::parse("urgent"), Priority::Normal);
        assert_eq!(Priority::parse(""), Priority::Normal);
    }

    #[test]
    fn terminal_states() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
    }

    #[test]
    fn new_task_starts_pending() {
        let task = Task::new("cad", "export", serde_json::json!({}), Priority::Normal, 3);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.retry_count, 0);
        assert!(task.started_at.is_none());
    }
}
