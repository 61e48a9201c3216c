use clap::Parser;
use relay::cli::{
    handle_classify, handle_config_init, handle_route, Cli, Commands, ConfigCommands,
};
use relay::config::LoggingConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    relay::logging::init(&logging);

    let result = match &cli.command {
        Commands::Classify(args) => handle_classify(args),
        Commands::Route(args) => handle_route(args),
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(args),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
