//! CLI type definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::migrate::MigrateArgs;
use super::commands::pipeline::{InsightsArgs, RecommendArgs, TemplatesArgs};
use super::commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "lean-advisor")]
#[command(about = "Lean Advisor - AI suggestions for lean-startup validation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to load instead of `.lean-advisor/config.yaml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Apply the SQLite schema
    Migrate(MigrateArgs),

    /// Recommend next experiments for a project
    Recommend(RecommendArgs),

    /// Generate smart templates for one artifact kind
    Templates(TemplatesArgs),

    /// Distil insights from completed experiments
    Insights(InsightsArgs),
}
