//! Per-dependency failure isolation
//!
//! Each named circuit is an independent state machine guarding one
//! unreliable downstream system (desktop CAD automation, paid compute).
//! A circuit that sees `failure_threshold` consecutive failures opens and
//! rejects calls immediately; after a cool-down it lets trial calls through
//! (half-open) and closes again only after `success_threshold` consecutive
//! successes. A rolling one-minute call cap applies regardless of state.

mod error;
mod registry;

pub use error::BreakerError;
pub use registry::CircuitBreakerRegistry;

use crate::config::CircuitConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls pass through normally.
    Closed,
    /// Calls are rejected without invoking the operation.
    Open,
    /// Trial state: calls pass through to probe recovery.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half_open"),
        }
    }
}

/// Introspection snapshot of one circuit.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStatus {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub total_calls: u64,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
}

struct CircuitInner {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    total_calls: u64,
    last_failure: Option<DateTime<Utc>>,
    last_success: Option<DateTime<Utc>>,
    opened_at: Option<Instant>,
    /// Timestamps of calls admitted within the rolling rate window.
    call_window: VecDeque<Instant>,
}

/// One named failure-isolation unit.
///
/// Every mutation happens under the inner mutex with no suspension point
/// inside; the guarded operation is awaited by the registry after the lock
/// is released, so two logically-concurrent calls cannot interleave a
/// counter update.
pub struct Circuit {
    name: String,
    config: CircuitConfig,
    inner: Mutex<CircuitInner>,
}

const RATE_WINDOW: Duration = Duration::from_secs(60);

impl Circuit {
    pub fn new(name: impl Into<String>, config: CircuitConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(CircuitInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                total_calls: 0,
                last_failure: None,
                last_success: None,
                opened_at: None,
                call_window: VecDeque::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Gate a call attempt: rate limit first, then circuit state.
    ///
    /// An open circuit whose cool-down has elapsed transitions to half-open
    /// here, at the moment the call is attempted, and the call is admitted
    /// as a trial.
    pub(crate) fn begin_call(&self) -> Result<(), BreakerError> {
        let mut inner = self.inner.lock().unwrap();
        inner.total_calls += 1;

        // Rate limit is orthogonal to state and never touches the
        // failure/success counters.
        let now = Instant::now();
        while let Some(front) = inner.call_window.front() {
            if now.duration_since(*front) >= RATE_WINDOW {
                inner.call_window.pop_front();
            } else {
                break;
            }
        }
        if inner.call_window.len() as u32 >= self.config.calls_per_minute {
            return Err(BreakerError::RateLimited {
                name: self.name.clone(),
                limit: self.config.calls_per_minute,
            });
        }

        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => {}
            CircuitState::Open => {
                let cooled_down = inner
                    .opened_at
                    .map(|t| t.elapsed() >= Duration::from_secs(self.config.cool_down_seconds))
                    .unwrap_or(true);
                if !cooled_down {
                    return Err(BreakerError::CircuitOpen {
                        name: self.name.clone(),
                    });
                }
                inner.state = CircuitState::HalfOpen;
                inner.consecutive_successes = 0;
                tracing::info!(circuit = %self.name, "Circuit half-open, probing recovery");
                metrics::counter!("relay_circuit_transitions",
                    "circuit" => self.name.clone(), "to" => "half_open"
                )
                .increment(1);
            }
        }

        inner.call_window.push_back(now);
        Ok(())
    }

    /// Record a successful operation outcome.
    pub(crate) fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.last_success = Some(Utc::now());

        match inner.state {
            CircuitState::Closed => {
                // A single failure does not persist across intervening
                // successes.
                inner.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.consecutive_successes = 0;
                    inner.opened_at = None;
                    tracing::info!(circuit = %self.name, "Circuit closed after recovery");
                    metrics::counter!("relay_circuit_transitions",
                        "circuit" => self.name.clone(), "to" => "closed"
                    )
                    .increment(1);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed operation outcome.
    pub(crate) fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.last_failure = Some(Utc::now());
        inner.consecutive_successes = 0;

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    Self::trip(&self.name, &mut inner);
                }
            }
            // Any failure while probing reopens immediately.
            CircuitState::HalfOpen => Self::trip(&self.name, &mut inner),
            CircuitState::Open => {}
        }
    }

    fn trip(name: &str, inner: &mut CircuitInner) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        tracing::warn!(
            circuit = %name,
            consecutive_failures = inner.consecutive_failures,
            "Circuit opened"
        );
        metrics::counter!("relay_circuit_transitions",
            "circuit" => name.to_string(), "to" => "open"
        )
        .increment(1);
    }

    /// Force the circuit back to closed with cleared counters.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.consecutive_successes = 0;
        inner.opened_at = None;
        tracing::info!(circuit = %self.name, "Circuit reset");
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }

    pub fn status(&self) -> CircuitStatus {
        let inner = self.inner.lock().unwrap();
        CircuitStatus {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            consecutive_successes: inner.consecutive_successes,
            total_calls: inner.total_calls,
            last_failure: inner.last_failure,
            last_success: inner.last_success,
        }
    }
}
