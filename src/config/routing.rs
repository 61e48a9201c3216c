//! Compute tier routing configuration

use serde::{Deserialize, Serialize};

/// A concrete generation profile selected for a complexity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeProfile {
    /// Model identifier understood by the serving layer.
    pub model: String,
    /// Output token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Per-tier compute profiles.
///
/// # Example
///
/// ```toml
/// [routing.simple]
/// model = "llama3:8b"
/// max_tokens = 1024
/// temperature = 0.2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub simple: ComputeProfile,
    pub moderate: ComputeProfile,
    pub complex: ComputeProfile,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            simple: ComputeProfile {
                model: "llama3:8b".to_string(),
                max_tokens: 1024,
                temperature: 0.2,
            },
            moderate: ComputeProfile {
                model: "llama3:70b".to_string(),
                max_tokens: 4096,
                temperature: 0.4,
            },
            complex: ComputeProfile {
                model: "deepseek-r1:70b".to_string(),
                max_tokens: 8192,
                temperature: 0.7,
            },
        }
    }
}
