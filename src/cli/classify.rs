//! Classify command handler

use crate::cli::ClassifyArgs;
use crate::config::RelayConfig;
use crate::router::TierRouter;
use anyhow::Result;

/// Handle `relay classify` command
///
/// Loads the configuration (falling back to defaults when the file is
/// absent) and prints the tier decision for the given message.
pub fn handle_classify(args: &ClassifyArgs) -> Result<String> {
    let config = load_config(args.config.as_path())?;
    let router = TierRouter::new(config.classifier, config.routing);

    let domain = args.domain.as_deref().unwrap_or("general");
    let decision = router.route(&args.message, domain);

    if args.json {
        Ok(serde_json::to_string_pretty(&decision)?)
    } else {
        Ok(format!(
            "tier:   {}\nmodel:  {}\ntokens: {}\nreason: {}",
            decision.tier, decision.profile.model, decision.profile.max_tokens, decision.reason
        ))
    }
}

pub(super) fn load_config(path: &std::path::Path) -> Result<RelayConfig> {
    let config = if path.exists() {
        RelayConfig::load(Some(path))?
    } else {
        RelayConfig::default()
    }
    .with_env_overrides();
    config.validate()?;
    Ok(config)
}
