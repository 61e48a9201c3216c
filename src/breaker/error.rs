//! Error types for circuit breaker calls

use thiserror::Error;

/// Errors surfaced by `call` on the circuit breaker registry.
///
/// The three variants are deliberately distinct: an open circuit and a
/// rate-limited call want different caller backoff strategies, and an
/// operation failure carries the underlying error.
#[derive(Debug, Error)]
pub enum BreakerError {
    /// The circuit is open; the operation was not invoked.
    #[error("circuit '{name}' is open")]
    CircuitOpen { name: String },

    /// The rolling one-minute call cap was exceeded; the operation was not
    /// invoked and no failure was recorded.
    #[error("circuit '{name}' rate limit exceeded ({limit} calls/minute)")]
    RateLimited { name: String, limit: u32 },

    /// The operation itself failed.
    #[error("operation failed: {0}")]
    Operation(#[source] anyhow::Error),
}

impl BreakerError {
    /// True when the call was rejected without invoking the operation.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BreakerError::CircuitOpen { .. } | BreakerError::RateLimited { .. }
        )
    }
}
