//! Relay - task dispatch and resilience layer
//!
//! Core coordination services for an automation platform: intent-routed
//! request orchestration, per-channel bounded dispatch queues, circuit
//! breakers around fragile dependencies, and complexity-tiered compute
//! routing.

pub mod breaker;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod handler;
pub mod logging;
pub mod orchestrator;
pub mod queue;
pub mod router;

use crate::breaker::CircuitBreakerRegistry;
use crate::config::{CircuitConfig, RelayConfig};
use crate::orchestrator::Orchestrator;
use crate::queue::DispatchQueue;
use crate::router::TierRouter;
use std::sync::Arc;

/// Shared handles to all core services, constructed once from
/// configuration and cloned into whatever needs them.
#[derive(Clone)]
pub struct RelayContext {
    pub orchestrator: Arc<Orchestrator>,
    pub queue: Arc<DispatchQueue>,
    pub breakers: Arc<CircuitBreakerRegistry>,
    pub router: Arc<TierRouter>,
}

impl RelayContext {
    /// Build all services from a validated configuration. Circuits named
    /// in the config are registered eagerly; others are created on first
    /// use with default settings.
    pub fn new(config: RelayConfig) -> Self {
        let breakers = Arc::new(CircuitBreakerRegistry::new(CircuitConfig::default()));
        for entry in &config.circuits {
            breakers.register(entry.name.clone(), entry.config);
        }

        Self {
            orchestrator: Arc::new(Orchestrator::new(config.orchestrator)),
            queue: Arc::new(DispatchQueue::new(config.queue)),
            breakers,
            router: Arc::new(TierRouter::new(config.classifier, config.routing)),
        }
    }

    /// Stop queue workers. Pending tasks are cancelled; running attempts
    /// finish.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}
