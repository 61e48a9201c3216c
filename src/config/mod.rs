//! Configuration module for Relay
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`RELAY_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use relay::config::RelayConfig;
//!
//! // Load defaults
//! let config = RelayConfig::default();
//! assert_eq!(config.orchestrator.history_limit, 10);
//!
//! // Parse from TOML
//! let toml = r#"
//! [orchestrator]
//! history_limit = 50
//! "#;
//! let config: RelayConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.orchestrator.history_limit, 50);
//! ```

pub mod breaker;
pub mod classifier;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod queue;
pub mod routing;

pub use breaker::{CircuitConfig, CircuitEntry};
pub use classifier::ClassifierConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use orchestrator::{OrchestratorConfig, GENERAL_CATEGORY, REVIEWER_CATEGORY};
pub use queue::QueueConfig;
pub use routing::{ComputeProfile, RoutingConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Relay core.
///
/// Aggregates all sections: queue scheduling, circuit definitions,
/// classifier tables, tier profiles, orchestrator tunables, and logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Dispatch queue scheduling and retry tunables
    pub queue: QueueConfig,
    /// Complexity classifier keyword tables
    pub classifier: ClassifierConfig,
    /// Per-tier compute profiles
    pub routing: RoutingConfig,
    /// Orchestrator intent table and history retention
    pub orchestrator: OrchestratorConfig,
    /// Named circuits registered at context construction
    pub circuits: Vec<CircuitEntry>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports RELAY_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("RELAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RELAY_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(limit) = std::env::var("RELAY_HISTORY_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.orchestrator.history_limit = n;
            }
        }
        if let Ok(retries) = std::env::var("RELAY_MAX_RETRIES") {
            if let Ok(n) = retries.parse() {
                self.queue.default_max_retries = n;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "queue.poll_interval_ms".to_string(),
                message: "poll interval must be non-zero".to_string(),
            });
        }
        if self.orchestrator.history_limit == 0 {
            return Err(ConfigError::Validation {
                field: "orchestrator.history_limit".to_string(),
                message: "history limit must be at least 1".to_string(),
            });
        }

        for (i, circuit) in self.circuits.iter().enumerate() {
            if circuit.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("circuits[{}].name", i),
                    message: "name cannot be empty".to_string(),
                });
            }
            if circuit.config.failure_threshold == 0 {
                return Err(ConfigError::Validation {
                    field: format!("circuits[{}].failure_threshold", i),
                    message: "failure threshold must be at least 1".to_string(),
                });
            }
            if circuit.config.success_threshold == 0 {
                return Err(ConfigError::Validation {
                    field: format!("circuits[{}].success_threshold", i),
                    message: "success threshold must be at least 1".to_string(),
                });
            }
        }

        for (tier, profile) in [
            ("simple", &self.routing.simple),
            ("moderate", &self.routing.moderate),
            ("complex", &self.routing.complex),
        ] {
            if profile.model.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("routing.{}.model", tier),
                    message: "model cannot be empty".to_string(),
                });
            }
            if profile.max_tokens == 0 {
                return Err(ConfigError::Validation {
                    field: format!("routing.{}.max_tokens", tier),
                    message: "token budget must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_relay_config_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.queue.default_max_retries, 3);
        assert_eq!(config.orchestrator.history_limit, 10);
        assert!(config.circuits.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [queue]
        default_max_retries = 1
        "#;

        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.queue.default_max_retries, 1);
        assert_eq!(config.queue.poll_interval_ms, 25); // Default
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../relay.example.toml");
        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.circuits.is_empty());
    }

    #[test]
    fn test_config_parse_circuits_array() {
        let toml = r#"
        [[circuits]]
        name = "cad-desktop"
        failure_threshold = 3

        [[circuits]]
        name = "paid-api"
        calls_per_minute = 10
        "#;

        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.circuits.len(), 2);
        assert_eq!(config.circuits[0].name, "cad-desktop");
        assert_eq!(config.circuits[1].config.calls_per_minute, 10);
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[orchestrator]\nhistory_limit = 5").unwrap();

        let config = RelayConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.orchestrator.history_limit, 5);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = RelayConfig::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = RelayConfig::load(None).unwrap();
        assert_eq!(config.orchestrator.history_limit, 10);
    }

    #[test]
    fn test_config_env_override_log_level() {
        std::env::set_var("RELAY_LOG_LEVEL", "debug");
        let config = RelayConfig::default().with_env_overrides();
        std::env::remove_var("RELAY_LOG_LEVEL");

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_env_override_history_limit() {
        std::env::set_var("RELAY_HISTORY_LIMIT", "42");
        let config = RelayConfig::default().with_env_overrides();
        std::env::remove_var("RELAY_HISTORY_LIMIT");

        assert_eq!(config.orchestrator.history_limit, 42);
    }

    #[test]
    fn test_config_env_invalid_value_ignored() {
        std::env::set_var("RELAY_MAX_RETRIES", "not-a-number");
        let config = RelayConfig::default().with_env_overrides();
        std::env::remove_var("RELAY_MAX_RETRIES");

        // Should keep default, not crash
        assert_eq!(config.queue.default_max_retries, 3);
    }

    #[test]
    fn test_config_validation_zero_poll_interval() {
        let mut config = RelayConfig::default();
        config.queue.poll_interval_ms = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "queue.poll_interval_ms"
        ));
    }

    #[test]
    fn test_config_validation_empty_circuit_name() {
        let mut config = RelayConfig::default();
        config.circuits.push(CircuitEntry {
            name: String::new(),
            config: CircuitConfig::default(),
        });

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field.contains("name")
        ));
    }

    #[test]
    fn test_config_validation_zero_failure_threshold() {
        let mut config = RelayConfig::default();
        config.circuits.push(CircuitEntry {
            name: "x".to_string(),
            config: CircuitConfig {
                failure_threshold: 0,
                ..Default::default()
            },
        });

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field.contains("failure_threshold")
        ));
    }

    #[test]
    fn test_config_validation_empty_profile_model() {
        let mut config = RelayConfig::default();
        config.routing.complex.model = String::new();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "routing.complex.model"
        ));
    }
}
