//! Bounded task-result history
//!
//! Ring buffer of the most recent routed results, retained for
//! introspection queries.

use super::TaskResult;
use std::collections::VecDeque;
use std::sync::RwLock;

/// Ring buffer of recently-returned task results.
pub struct ResultHistory {
    entries: RwLock<VecDeque<TaskResult>>,
    capacity: usize,
}

impl ResultHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a result, evicting the oldest when at capacity.
    pub fn push(&self, result: TaskResult) {
        let mut entries = self.entries.write().unwrap();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(result);
    }

    /// The most recent `limit` results in chronological order.
    pub fn recent(&self, limit: usize) -> Vec<TaskResult> {
        let entries = self.entries.read().unwrap();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn result(tag: &str) -> TaskResult {
        TaskResult {
            category: "general".to_string(),
            success: true,
            output: json!(tag),
            error: None,
            metadata: HashMap::new(),
            completed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let history = ResultHistory::new(3);
        for tag in ["a", "b", "c", "d"] {
            history.push(result(tag));
        }

        assert_eq!(history.len(), 3);
        let recent = history.recent(10);
        assert_eq!(recent[0].output, json!("b"));
        assert_eq!(recent[2].output, json!("d"));
    }

    #[test]
    fn recent_limits_and_keeps_order() {
        let history = ResultHistory::new(10);
        for tag in ["a", "b", "c"] {
            history.push(result(tag));
        }

        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].output, json!("b"));
        assert_eq!(recent[1].output, json!("c"));
    }

    #[test]
    fn empty_history() {
        let history = ResultHistory::new(5);
        assert!(history.is_empty());
        assert!(history.recent(3).is_empty());
    }
}
