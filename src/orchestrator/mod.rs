//! Request orchestrator
//!
//! Top-level entry point: classifies an inbound message's intent, selects a
//! registered handler, captures the handler's outcome as a [`TaskResult`],
//! and optionally runs a producer-reviewer pass. Handler failures are
//! recovered here and reported in the result; they never propagate to the
//! orchestrator's caller.

mod history;
mod intent;

pub use history::ResultHistory;
pub use intent::IntentTable;

use crate::config::{OrchestratorConfig, GENERAL_CATEGORY, REVIEWER_CATEGORY};
use crate::handler::Handler;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// An inbound request to route.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub message: String,
    pub context: HashMap<String, Value>,
    /// Explicit handler category; skips intent classification when set.
    pub preferred_category: Option<String>,
    /// Run the result through the reviewer handler before returning.
    pub require_review: bool,
}

impl RouteRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.preferred_category = Some(category.into());
        self
    }

    pub fn with_context(mut self, context: HashMap<String, Value>) -> Self {
        self.context = context;
        self
    }

    pub fn with_review(mut self) -> Self {
        self.require_review = true;
        self
    }
}

/// The orchestrator's return value. Immutable once created; a copy is
/// appended to the bounded history.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub category: String,
    pub success: bool,
    pub output: Value,
    pub error: Option<String>,
    pub metadata: HashMap<String, Value>,
    pub completed_at: DateTime<Utc>,
}

/// Routes requests to registered handlers.
///
/// Handlers are registered once at startup and shared read-only afterwards.
pub struct Orchestrator {
    handlers: DashMap<String, Arc<dyn Handler>>,
    intents: IntentTable,
    history: ResultHistory,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            handlers: DashMap::new(),
            intents: IntentTable::new(config.intents, GENERAL_CATEGORY),
            history: ResultHistory::new(config.history_limit),
        }
    }

    /// Register a handler for a category. Registering the reviewer category
    /// enables the review pass.
    pub fn register_handler(&self, category: impl Into<String>, handler: Arc<dyn Handler>) {
        let category = category.into();
        tracing::info!(category = %category, "Handler registered");
        self.handlers.insert(category, handler);
    }

    /// Route a request to the appropriate handler and return its result.
    ///
    /// Never fails: handler errors, missing handlers, and reviewer problems
    /// are all captured in the returned [`TaskResult`].
    pub async fn route(&self, request: RouteRequest) -> TaskResult {
        let category = match &request.preferred_category {
            Some(category) => category.clone(),
            None => self.intents.classify(&request.message),
        };
        tracing::debug!(
            category = %category,
            explicit = request.preferred_category.is_some(),
            "Request routed"
        );

        let mut metadata: HashMap<String, Value> = HashMap::new();
        let mut result = match self.resolve_handler(&category, &mut metadata) {
            Some(handler) => match handler.handle(&request.message, &request.context).await {
                Ok(output) => TaskResult {
                    category: category.clone(),
                    success: true,
                    output,
                    error: None,
                    metadata: HashMap::new(),
                    completed_at: Utc::now(),
                },
                Err(error) => {
                    tracing::warn!(category = %category, error = %error, "Handler failed");
                    TaskResult {
                        category: category.clone(),
                        success: false,
                        output: Value::Null,
                        error: Some(error.to_string()),
                        metadata: HashMap::new(),
                        completed_at: Utc::now(),
                    }
                }
            },
            // No handler anywhere, not even general: synthesize an
            // acknowledgment instead of failing.
            None => TaskResult {
                category: category.clone(),
                success: false,
                output: json!({
                    "acknowledged": true,
                    "message": request.message,
                }),
                error: Some(format!("{} agent offline", category)),
                metadata: HashMap::new(),
                completed_at: Utc::now(),
            },
        };
        result.metadata = metadata;

        if request.require_review {
            self.review(&request, &mut result).await;
        }

        metrics::counter!(
            "relay_requests_routed",
            "category" => result.category.clone(),
            "outcome" => if result.success { "success" } else { "failure" }
        )
        .increment(1);

        self.history.push(result.clone());
        result
    }

    /// Look up the handler for a category, falling back to "general".
    fn resolve_handler(
        &self,
        category: &str,
        metadata: &mut HashMap<String, Value>,
    ) -> Option<Arc<dyn Handler>> {
        if let Some(handler) = self.handlers.get(category) {
            return Some(Arc::clone(&handler));
        }
        if category != GENERAL_CATEGORY {
            if let Some(general) = self.handlers.get(GENERAL_CATEGORY) {
                tracing::debug!(category = %category, "No handler, falling back to general");
                metadata.insert("handled_by".to_string(), json!(GENERAL_CATEGORY));
                return Some(Arc::clone(&general));
            }
        }
        None
    }

    /// Producer-reviewer pass: feed the successful output through the
    /// reviewer handler and record the verdict in metadata. A missing or
    /// failing reviewer is recorded, never escalated.
    async fn review(&self, request: &RouteRequest, result: &mut TaskResult) {
        if !result.success {
            result
                .metadata
                .insert("reviewed".to_string(), json!(false));
            return;
        }

        let reviewer = match self.handlers.get(REVIEWER_CATEGORY) {
            Some(handler) => Arc::clone(&handler),
            None => {
                result.metadata.insert("reviewed".to_string(), json!(false));
                result
                    .metadata
                    .insert("review".to_string(), json!("reviewer unavailable"));
                return;
            }
        };

        let review_message = result.output.to_string();
        let mut review_context = request.context.clone();
        review_context.insert("original_message".to_string(), json!(request.message));
        review_context.insert("category".to_string(), json!(result.category));

        match reviewer.handle(&review_message, &review_context).await {
            Ok(verdict) => {
                result.metadata.insert("reviewed".to_string(), json!(true));
                result.metadata.insert("review_verdict".to_string(), verdict);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Reviewer failed");
                result.metadata.insert("reviewed".to_string(), json!(true));
                result
                    .metadata
                    .insert("review_error".to_string(), json!(error.to_string()));
            }
        }
    }

    /// Online/offline status per known category.
    pub fn agent_status(&self) -> HashMap<String, String> {
        let mut status: HashMap<String, String> = self
            .handlers
            .iter()
            .map(|entry| (entry.key().clone(), "online".to_string()))
            .collect();
        for category in self.intents.categories() {
            status
                .entry(category.clone())
                .or_insert_with(|| "offline".to_string());
        }
        status
            .entry(GENERAL_CATEGORY.to_string())
            .or_insert_with(|| "offline".to_string());
        status
    }

    /// The most recent `limit` task results, oldest first.
    pub fn task_history(&self, limit: usize) -> Vec<TaskResult> {
        self.history.recent(limit)
    }
}
