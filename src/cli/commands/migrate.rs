//! Implementation of the `lean-advisor migrate` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::sqlite::{database_url, initialize_database, Migrator};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Database path (defaults to `store.database_path`)
    #[arg(long)]
    pub database: Option<String>,
}

/// Result of `migrate`.
#[derive(Debug, Serialize)]
pub struct MigrateOutput {
    /// Database file that was migrated.
    pub database: String,
    /// Schema version after migration.
    pub schema_version: i64,
}

impl CommandOutput for MigrateOutput {
    fn to_human(&self) -> String {
        format!("Database {} is at schema version {}", self.database, self.schema_version)
    }
}

/// Apply embedded migrations to the SQLite database.
pub async fn execute(args: MigrateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let database = args.database.unwrap_or_else(|| config.store.database_path.clone());
    let pool = initialize_database(&database_url(&database), None)
        .await
        .with_context(|| format!("Failed to migrate {database}"))?;
    let schema_version = Migrator::new(pool)
        .get_current_version()
        .await
        .context("Failed to read schema version")?;

    output(&MigrateOutput { database, schema_version }, json_mode);
    Ok(())
}
