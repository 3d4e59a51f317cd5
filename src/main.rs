//! Entry point wiring CLI dispatch to the matching engine.

mod cli;

use anyhow::Result;
use cli::Cli;
use foodlens::{config::Settings, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
