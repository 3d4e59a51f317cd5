//! CLI entry-point for serving the HTTP API.

use std::sync::Arc;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use foodlens::{api, config::Settings, data::DictionaryIndex};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind; defaults to `FOODLENS_PORT` or 8080.
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address; defaults to `FOODLENS_HOST` or localhost.
    #[arg(long)]
    pub host: Option<String>,
}

#[instrument(skip(settings, index))]
pub async fn run(args: Args, settings: Settings, index: Arc<DictionaryIndex>) -> Result<()> {
    let host = args.host.unwrap_or(settings.host);
    let port = args.port.unwrap_or(settings.port);
    api::serve(index, host, port).await
}
