//! Complexity classification for generative requests
//!
//! A pure, data-driven scorer: marker tables and thresholds come from
//! [`ClassifierConfig`], so domain tuning never touches this logic. The
//! classifier cannot fail; a message matching nothing degrades to Moderate.

use crate::config::ClassifierConfig;
use serde::{Deserialize, Serialize};

/// Coarse complexity tier used to pick a compute profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Simple,
    Moderate,
    Complex,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Simple => write!(f, "simple"),
            Tier::Moderate => write!(f, "moderate"),
            Tier::Complex => write!(f, "complex"),
        }
    }
}

/// Full scoring breakdown for one message.
///
/// The tier is derived from the score; the component counts feed the
/// router's human-readable justification.
#[derive(Debug, Clone)]
pub struct ComplexityScore {
    pub tier: Tier,
    pub score: u32,
    pub complex_matches: u32,
    pub booster_matches: u32,
    pub length_bonus: bool,
    pub simple_match: bool,
}

/// Scores messages against the configured marker tables.
pub struct ComplexityClassifier {
    config: ClassifierConfig,
}

impl ComplexityClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a message into a complexity tier.
    pub fn classify(&self, message: &str) -> Tier {
        self.evaluate(message).tier
    }

    /// Score a message and return the full breakdown.
    ///
    /// Score = complex-marker matches + booster matches + length bonus.
    /// Score >= 2 is Complex; score 0 with a simple-marker match is Simple;
    /// everything else is Moderate.
    pub fn evaluate(&self, message: &str) -> ComplexityScore {
        let lowered = message.to_lowercase();

        let complex_matches = count_matches(&lowered, &self.config.complex_markers);
        let booster_matches = count_matches(&lowered, &self.config.boosters);
        let length_bonus =
            lowered.split_whitespace().count() >= self.config.length_threshold_words;
        let simple_match = self
            .config
            .simple_markers
            .iter()
            .any(|m| lowered.contains(&m.to_lowercase()));

        let score = complex_matches + booster_matches + u32::from(length_bonus);

        let tier = if score >= 2 {
            Tier::Complex
        } else if score == 0 && simple_match {
            Tier::Simple
        } else {
            Tier::Moderate
        };

        ComplexityScore {
            tier,
            score,
            complex_matches,
            booster_matches,
            length_bonus,
            simple_match,
        }
    }

    /// Whether the given domain always routes to the complex tier.
    pub fn is_forced_complex(&self, domain: &str) -> bool {
        let lowered = domain.to_lowercase();
        self.config
            .forced_complex_domains
            .iter()
            .any(|d| d.to_lowercase() == lowered)
    }
}

fn count_matches(lowered: &str, markers: &[String]) -> u32 {
    markers
        .iter()
        .filter(|m| lowered.contains(&m.to_lowercase()))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ComplexityClassifier {
        ComplexityClassifier::new(ClassifierConfig::default())
    }

    #[test]
    fn greeting_classifies_simple() {
        assert_eq!(classifier().classify("hi"), Tier::Simple);
        assert_eq!(classifier().classify("Thanks!"), Tier::Simple);
    }

    #[test]
    fn unmatched_message_degrades_to_moderate() {
        assert_eq!(
            classifier().classify("close my open position on silver"),
            Tier::Moderate
        );
    }

    #[test]
    fn single_complex_marker_is_moderate() {
        // Score 1: one complex marker, short message, no boosters
        assert_eq!(classifier().classify("optimize this"), Tier::Moderate);
    }

    #[test]
    fn long_analytical_message_classifies_complex() {
        // 40 words with "confluence" and "optimize": 2 markers + length bonus
        let message = "Please look at the confluence between the daily and four hour \
                       charts and then optimize the position sizing model so that the \
                       overall portfolio heat stays below two percent while keeping \
                       every single one of the existing entries intact";
        assert!(message.split_whitespace().count() >= 30);

        let breakdown = classifier().evaluate(message);
        assert_eq!(breakdown.tier, Tier::Complex);
        assert_eq!(breakdown.complex_matches, 2);
        assert!(breakdown.length_bonus);
        assert!(breakdown.score >= 3);
    }

    #[test]
    fn two_markers_alone_reach_complex() {
        assert_eq!(
            classifier().classify("backtest this strategy"),
            Tier::Complex
        );
    }

    #[test]
    fn booster_counts_toward_score() {
        // "analyze" + "step by step" = score 2
        assert_eq!(
            classifier().classify("analyze this step by step"),
            Tier::Complex
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classifier().classify("BACKTEST the STRATEGY"),
            Tier::Complex
        );
    }

    #[test]
    fn forced_complex_domain_lookup() {
        let c = classifier();
        assert!(c.is_forced_complex("audit"));
        assert!(c.is_forced_complex("AUDIT"));
        assert!(!c.is_forced_complex("trading"));
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let message = "optimize the multi-timeframe correlation model";
        let first = c.classify(message);
        for _ in 0..10 {
            assert_eq!(c.classify(message), first);
        }
    }

    #[test]
    fn custom_marker_table_is_honored() {
        let config = ClassifierConfig {
            complex_markers: vec!["kinematics".to_string(), "tolerance".to_string()],
            ..Default::default()
        };
        let c = ComplexityClassifier::new(config);
        assert_eq!(
            c.classify("check the kinematics and tolerance chain"),
            Tier::Complex
        );
    }
}
