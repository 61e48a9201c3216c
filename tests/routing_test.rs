//! Integration tests for complexity classification and tier routing

use relay::classifier::{ComplexityClassifier, Tier};
use relay::config::{ClassifierConfig, RoutingConfig};
use relay::router::TierRouter;

fn router() -> TierRouter {
    TierRouter::new(ClassifierConfig::default(), RoutingConfig::default())
}

#[test]
fn greeting_lands_on_the_simple_tier() {
    let decision = router().route("hi", "general");
    assert_eq!(decision.tier, Tier::Simple);
    assert_eq!(decision.profile.model, "llama3:8b");
    assert_eq!(decision.profile.max_tokens, 1024);
}

#[test]
fn long_analytical_request_lands_on_the_complex_tier() {
    // Over thirty words, with two complex markers.
    let message = "please analyze the multi-timeframe confluence between the \
                   daily and four hour charts for GBP/USD and optimize the \
                   entry so that the stop sits below the most recent swing \
                   low while keeping at least a two to one reward ratio";
    let decision = router().route(message, "trading");
    assert_eq!(decision.tier, Tier::Complex);
    assert_eq!(decision.profile.model, "deepseek-r1:70b");
}

#[test]
fn ordinary_request_lands_on_the_moderate_tier() {
    let decision = router().route("move my stop to breakeven on the open position", "trading");
    assert_eq!(decision.tier, Tier::Moderate);
    assert_eq!(decision.profile.model, "llama3:70b");
}

#[test]
fn booster_phrases_escalate_a_short_message() {
    let decision = router().route("explain this strategy step by step in depth", "trading");
    assert_eq!(decision.tier, Tier::Complex);
}

#[test]
fn forced_domain_ignores_message_content() {
    let decision = router().route("thanks", "audit");
    assert_eq!(decision.tier, Tier::Complex);
    assert!(decision.reason.contains("audit"));
}

#[test]
fn classification_is_deterministic() {
    let classifier = ComplexityClassifier::new(ClassifierConfig::default());
    let message = "backtest this breakout strategy against last year's data";
    let first = classifier.evaluate(message);
    for _ in 0..10 {
        let again = classifier.evaluate(message);
        assert_eq!(again.tier, first.tier);
        assert_eq!(again.score, first.score);
    }
}

#[test]
fn decision_serializes_for_logging() {
    let decision = router().route("hello there", "general");
    let value = serde_json::to_value(&decision).unwrap();
    assert_eq!(value["tier"], "simple");
    assert!(value["profile"]["model"].is_string());
    assert!(value["reason"].is_string());
}

#[test]
fn custom_tables_change_the_outcome() {
    let mut config = ClassifierConfig::default();
    config.complex_markers.push("reconcile".to_string());
    config.complex_markers.push("ledger".to_string());
    let router = TierRouter::new(config, RoutingConfig::default());

    let decision = router.route("reconcile the ledger", "finance");
    assert_eq!(decision.tier, Tier::Complex);
}
