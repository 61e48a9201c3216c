//! Route command handler

use crate::cli::RouteArgs;
use crate::config::GENERAL_CATEGORY;
use crate::orchestrator::IntentTable;
use crate::router::TierRouter;
use anyhow::Result;
use serde_json::json;

/// Handle `relay route` command
///
/// Dry run of the routing pipeline: classifies the message's intent
/// category and picks the compute tier, without invoking any handler.
pub fn handle_route(args: &RouteArgs) -> Result<String> {
    let config = super::classify::load_config(args.config.as_path())?;

    let intents = IntentTable::new(config.orchestrator.intents, GENERAL_CATEGORY);
    let category = match &args.category {
        Some(category) => category.clone(),
        None => intents.classify(&args.message),
    };

    let router = TierRouter::new(config.classifier, config.routing);
    let decision = router.route(&args.message, &category);

    if args.json {
        let value = json!({
            "category": category,
            "explicit": args.category.is_some(),
            "tier": decision.tier,
            "profile": decision.profile,
            "reason": decision.reason,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(format!(
            "category: {}{}\ntier:     {}\nmodel:    {}\nreason:   {}",
            category,
            if args.category.is_some() {
                " (explicit)"
            } else {
                ""
            },
            decision.tier,
            decision.profile.model,
            decision.reason
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(message: &str, category: Option<&str>, json: bool) -> RouteArgs {
        RouteArgs {
            message: message.to_string(),
            category: category.map(String::from),
            json,
            config: PathBuf::from("/nonexistent/relay.toml"),
        }
    }

    #[test]
    fn test_route_classifies_intent() {
        let output = handle_route(&args("what's the GBP/USD setup", None, false)).unwrap();
        assert!(output.contains("category: trading"));
    }

    #[test]
    fn test_route_explicit_category() {
        let output = handle_route(&args("do it", Some("cad"), false)).unwrap();
        assert!(output.contains("category: cad (explicit)"));
    }

    #[test]
    fn test_route_unmatched_falls_to_general() {
        let output = handle_route(&args("what's for lunch", None, false)).unwrap();
        assert!(output.contains("category: general"));
    }

    #[test]
    fn test_route_json_output() {
        let output = handle_route(&args("extrude the sketch", None, true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["category"], "cad");
        assert_eq!(value["explicit"], false);
    }
}
