//! Compute tier selection
//!
//! Maps a classified complexity tier to a concrete compute profile (model,
//! token budget, temperature) and records why, so tier choices are
//! observable after the fact. Consulted by handlers that generate text;
//! not on the orchestrator's routing path.

use crate::classifier::{ComplexityClassifier, Tier};
use crate::config::{ClassifierConfig, ComputeProfile, RoutingConfig};
use serde::Serialize;

/// An immutable per-request routing decision.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingDecision {
    /// Caller-declared request domain (e.g. "trading", "cad", "audit").
    pub domain: String,
    /// Complexity tier the decision was based on.
    pub tier: Tier,
    /// Selected compute profile.
    pub profile: ComputeProfile,
    /// Human-readable justification for observability.
    pub reason: String,
}

/// Selects a cost/latency-appropriate compute profile per request.
pub struct TierRouter {
    classifier: ComplexityClassifier,
    profiles: RoutingConfig,
}

impl TierRouter {
    pub fn new(classifier_config: ClassifierConfig, profiles: RoutingConfig) -> Self {
        Self {
            classifier: ComplexityClassifier::new(classifier_config),
            profiles,
        }
    }

    /// Classify a message without selecting a profile.
    pub fn classify(&self, message: &str) -> Tier {
        self.classifier.classify(message)
    }

    /// Pick a compute profile for a message in the given domain.
    ///
    /// Forced-complex domains bypass scoring entirely; some request
    /// categories always warrant the higher-fidelity tier.
    pub fn route(&self, message: &str, domain: &str) -> RoutingDecision {
        if self.classifier.is_forced_complex(domain) {
            let decision = RoutingDecision {
                domain: domain.to_string(),
                tier: Tier::Complex,
                profile: self.profiles.complex.clone(),
                reason: format!("domain '{}' always routes to the complex tier", domain),
            };
            tracing::debug!(
                domain = %domain,
                model = %decision.profile.model,
                "Tier forced by domain policy"
            );
            return decision;
        }

        let breakdown = self.classifier.evaluate(message);
        let profile = self.profile_for(breakdown.tier).clone();
        let reason = format!(
            "complexity score {} ({} complex markers, {} boosters{}){}",
            breakdown.score,
            breakdown.complex_matches,
            breakdown.booster_matches,
            if breakdown.length_bonus {
                ", length bonus"
            } else {
                ""
            },
            if breakdown.tier == Tier::Simple {
                "; simple marker matched"
            } else {
                ""
            },
        );

        tracing::debug!(
            domain = %domain,
            tier = %breakdown.tier,
            score = breakdown.score,
            model = %profile.model,
            "Tier selected"
        );

        RoutingDecision {
            domain: domain.to_string(),
            tier: breakdown.tier,
            profile,
            reason,
        }
    }

    fn profile_for(&self, tier: Tier) -> &ComputeProfile {
        match tier {
            Tier::Simple => &self.profiles.simple,
            Tier::Moderate => &self.profiles.moderate,
            Tier::Complex => &self.profiles.complex,
        }
    }
}
