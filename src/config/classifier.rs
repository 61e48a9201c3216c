//! Complexity classifier configuration
//!
//! The marker lists are data, not code, so deployments can tune them per
//! domain without touching the scoring logic.

use serde::{Deserialize, Serialize};

/// Keyword and threshold tables driving complexity classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Markers that indicate a trivially-answerable message.
    pub simple_markers: Vec<String>,

    /// Markers that indicate analytical or multi-step work.
    pub complex_markers: Vec<String>,

    /// Phrases that add one point to the complexity score each.
    pub boosters: Vec<String>,

    /// Word count at or above which a message earns a length bonus point.
    pub length_threshold_words: usize,

    /// Domains whose requests are always classified complex, regardless of
    /// message content (policy: audit-style work always gets the
    /// higher-fidelity tier).
    pub forced_complex_domains: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            simple_markers: strings(&[
                "hi",
                "hello",
                "hey",
                "thanks",
                "thank you",
                "good morning",
                "good evening",
                "status",
                "ping",
                "what time",
            ]),
            complex_markers: strings(&[
                "analyze",
                "analysis",
                "optimize",
                "optimise",
                "confluence",
                "backtest",
                "strategy",
                "refactor",
                "architecture",
                "multi-timeframe",
                "correlation",
                "simulate",
                "forecast",
                "tolerance stack",
            ]),
            boosters: strings(&[
                "step by step",
                "in depth",
                "across all",
                "trade-offs",
                "compare and contrast",
                "explain why",
            ]),
            length_threshold_words: 30,
            forced_complex_domains: strings(&["audit"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_defaults() {
        let config = ClassifierConfig::default();
        assert!(config.simple_markers.contains(&"hi".to_string()));
        assert!(config.complex_markers.contains(&"confluence".to_string()));
        assert_eq!(config.length_threshold_words, 30);
        assert_eq!(config.forced_complex_domains, vec!["audit"]);
    }

    #[test]
    fn test_classifier_config_override_markers() {
        let toml = r#"
        complex_markers = ["kinematics"]
        length_threshold_words = 50
        "#;

        let config: ClassifierConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.complex_markers, vec!["kinematics"]);
        assert_eq!(config.length_threshold_words, 50);
        // Untouched sections keep defaults
        assert!(config.simple_markers.contains(&"hello".to_string()));
    }
}
