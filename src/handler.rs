//! Handler traits shared by the orchestrator and the dispatch queue.
//!
//! Handler outcomes are explicit `Result` values rather than propagated
//! panics, so the orchestrator's "never propagate a handler failure"
//! contract is enforced at the type level.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Errors a handler can report back to the core.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler ran but could not produce a result.
    #[error("{0}")]
    Failed(String),

    /// A downstream dependency the handler needs is unavailable.
    #[error("dependency unavailable: {0}")]
    Unavailable(String),
}

impl HandlerError {
    /// Shorthand for a generic handler failure.
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// A domain handler registered with the orchestrator (trading analysis,
/// CAD automation, general assistance, reviewer).
///
/// Invocation is awaited by the orchestrator but may suspend internally
/// on external calls.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        message: &str,
        context: &HashMap<String, Value>,
    ) -> Result<Value, HandlerError>;
}

/// A command handler bound to a dispatch queue channel.
///
/// One implementation per channel; the queue owns all scheduling, the
/// handler only executes a single command against its downstream system.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    async fn execute(&self, command: &str, payload: &Value) -> Result<Value, HandlerError>;
}
