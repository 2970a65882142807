//! Lean Advisor CLI entry point.

use anyhow::Result;
use clap::Parser;

use lean_advisor::cli::commands::{migrate, pipeline, serve};
use lean_advisor::cli::{handle_error, load_config, Cli, Commands};
use lean_advisor::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;

    match cli.command {
        Commands::Serve(args) => serve::execute(args, &config).await,
        Commands::Migrate(args) => migrate::execute(args, &config, cli.json).await,
        Commands::Recommend(args) => pipeline::recommend(args, &config, cli.json).await,
        Commands::Templates(args) => pipeline::templates(args, &config, cli.json).await,
        Commands::Insights(args) => pipeline::insights(args, &config, cli.json).await,
    }
}
