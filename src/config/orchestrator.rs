//! Orchestrator configuration
//!
//! The intent table maps handler categories to keyword lists. It is plain
//! data so deployments can re-tune routing without code changes, and the
//! scoring logic can be unit-tested against arbitrary tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category the orchestrator falls back to on ties, zero scores, and
/// missing handlers.
pub const GENERAL_CATEGORY: &str = "general";

/// Category of the reviewer handler used for the producer-reviewer pass.
pub const REVIEWER_CATEGORY: &str = "inspector";

/// Orchestrator tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Most-recent-N task results retained for introspection.
    pub history_limit: usize,

    /// Intent keyword table: category name to keyword list. A message is
    /// scored one point per matched keyword (case-insensitive substring).
    pub intents: HashMap<String, Vec<String>>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let mut intents = HashMap::new();
        intents.insert(
            "trading".to_string(),
            strings(&[
                "trade",
                "trading",
                "forex",
                "pip",
                "gbp/usd",
                "eur/usd",
                "xau/usd",
                "chart",
                "setup",
                "entry",
                "stop loss",
                "take profit",
                "lot size",
                "backtest",
            ]),
        );
        intents.insert(
            "cad".to_string(),
            strings(&[
                "cad",
                "drawing",
                "dxf",
                "step file",
                "sketch",
                "extrude",
                "assembly",
                "dimension",
                "solidworks",
                "fillet",
                "tolerance",
            ]),
        );

        Self {
            history_limit: 10,
            intents,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
