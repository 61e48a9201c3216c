//! Named circuit registry
//!
//! Circuits are registered explicitly at startup or implicitly with default
//! configuration on first use. Circuits never share state.

use super::{BreakerError, Circuit, CircuitStatus};
use crate::config::CircuitConfig;
use dashmap::DashMap;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Registry of independent per-dependency circuits.
pub struct CircuitBreakerRegistry {
    circuits: DashMap<String, Arc<Circuit>>,
    default_config: CircuitConfig,
}

impl CircuitBreakerRegistry {
    pub fn new(default_config: CircuitConfig) -> Self {
        Self {
            circuits: DashMap::new(),
            default_config,
        }
    }

    /// Register a circuit with explicit configuration.
    ///
    /// Re-registering an existing name replaces its configuration and
    /// restarts the circuit closed.
    pub fn register(&self, name: impl Into<String>, config: CircuitConfig) -> Arc<Circuit> {
        let name = name.into();
        let circuit = Arc::new(Circuit::new(name.clone(), config));
        self.circuits.insert(name, Arc::clone(&circuit));
        circuit
    }

    /// Get a circuit, creating it with the default config on first use.
    pub fn circuit(&self, name: &str) -> Arc<Circuit> {
        if let Some(existing) = self.circuits.get(name) {
            return Arc::clone(&existing);
        }
        let created = self
            .circuits
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(circuit = %name, "Implicitly registering circuit");
                Arc::new(Circuit::new(name, self.default_config))
            });
        Arc::clone(&created)
    }

    /// Run an operation through the named circuit.
    ///
    /// Rejects fast with [`BreakerError::CircuitOpen`] or
    /// [`BreakerError::RateLimited`] without invoking the operation;
    /// otherwise the operation's outcome drives the state machine and a
    /// failure is surfaced as [`BreakerError::Operation`].
    pub async fn call<T, F, Fut>(&self, name: &str, operation: F) -> Result<T, BreakerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let circuit = self.circuit(name);
        circuit.begin_call()?;

        // The lock is released; the await happens outside any critical
        // section.
        match operation().await {
            Ok(value) => {
                circuit.record_success();
                Ok(value)
            }
            Err(error) => {
                circuit.record_failure();
                tracing::debug!(circuit = %name, error = %error, "Guarded operation failed");
                Err(BreakerError::Operation(error))
            }
        }
    }

    /// Run an operation through the named circuit, invoking the fallback on
    /// any failure: open circuit, rate limit, or operation error.
    ///
    /// Never fails on its own; only an error from the fallback itself
    /// propagates.
    pub async fn call_with_fallback<T, F, Fut, G, Gut>(
        &self,
        name: &str,
        operation: F,
        fallback: G,
    ) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        G: FnOnce() -> Gut,
        Gut: Future<Output = anyhow::Result<T>>,
    {
        match self.call(name, operation).await {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::debug!(circuit = %name, error = %error, "Falling back");
                fallback().await
            }
        }
    }

    /// Reset a circuit to closed. No-op for unknown names.
    pub fn reset(&self, name: &str) {
        if let Some(circuit) = self.circuits.get(name) {
            circuit.reset();
        }
    }

    /// Snapshot every registered circuit's state.
    pub fn status(&self) -> HashMap<String, CircuitStatus> {
        self.circuits
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status()))
            .collect()
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitConfig::default())
    }
}
