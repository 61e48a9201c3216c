//! Command-line interface for Relay
//!
//! Diagnostic commands for tuning the classifier and intent tables without
//! standing up handlers.
//!
//! # Commands
//!
//! - `classify` - Score a message and show the selected compute tier
//! - `route` - Dry-run intent classification and tier selection
//! - `config` - Configuration utilities (init)
//!
//! # Example
//!
//! ```bash
//! # See which tier a message lands on
//! relay classify "analyze the GBP/USD multi-timeframe confluence"
//!
//! # Dry-run the full routing decision as JSON
//! relay route --json "extrude the base sketch 10mm"
//! ```

pub mod classify;
pub mod config;
pub mod route;

pub use classify::handle_classify;
pub use config::handle_config_init;
pub use route::handle_route;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Relay - task dispatch and resilience layer
#[derive(Parser, Debug)]
#[command(
    name = "relay",
    version,
    about = "Task dispatch and resilience layer for automation handlers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RELAY_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a message's complexity and show the selected tier
    Classify(ClassifyArgs),
    /// Dry-run intent classification and tier selection for a message
    Route(RouteArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Message to classify
    pub message: String,

    /// Request domain (forced-complex domains skip scoring)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Message to route
    pub message: String,

    /// Explicit category (skips intent classification)
    #[arg(long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "relay.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}
