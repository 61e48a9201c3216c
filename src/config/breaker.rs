//! Circuit breaker configuration

use serde::{Deserialize, Serialize};

/// Tunables for a single circuit.
///
/// # Example
///
/// ```toml
/// [[circuits]]
/// name = "cad-desktop"
/// failure_threshold = 3
/// success_threshold = 2
/// cool_down_seconds = 30
/// calls_per_minute = 20
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Consecutive failures that trip the circuit open.
    pub failure_threshold: u32,

    /// Consecutive half-open successes required to close the circuit.
    pub success_threshold: u32,

    /// Seconds the circuit stays open before a trial call is allowed through.
    pub cool_down_seconds: u64,

    /// Rolling one-minute cap on calls, independent of circuit state.
    pub calls_per_minute: u32,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            cool_down_seconds: 30,
            calls_per_minute: 60,
        }
    }
}

/// A named circuit definition from the `[[circuits]]` config array,
/// registered when the context is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitEntry {
    pub name: String,
    #[serde(flatten)]
    pub config: CircuitConfig,
}
