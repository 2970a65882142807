//! Implementation of the `lean-advisor serve` command.

use anyhow::Result;
use clap::Args;

use super::build_advisor;
use crate::adapters::http::{AdvisorHttpServer, HttpConfig};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Answer every model call with empty output
    #[arg(long)]
    pub offline: bool,
}

/// Serve the HTTP API until ctrl-c.
pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let advisor = build_advisor(config, args.offline).await?;

    let mut http = HttpConfig::from(config.server.clone());
    if let Some(host) = args.host {
        http.host = host;
    }
    if let Some(port) = args.port {
        http.port = port;
    }

    AdvisorHttpServer::new(advisor, http)
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
