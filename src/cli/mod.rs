//! Command-line interface wiring for foodlens.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use foodlens::{
    config::Settings,
    data::{build_index, DictionaryIndex},
    nlp::Encoder,
};

pub mod analyze;
pub mod inspect;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Ingredient declaration matcher", long_about = None)]
pub struct Cli {
    /// Dictionary JSON to load instead of `FOODLENS_DICTIONARY`.
    #[arg(long, global = true)]
    dictionary: Option<std::path::PathBuf>,
    /// Enable the semantic tier (requires the `embeddings` feature).
    #[arg(long, global = true)]
    semantic: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, mut settings: Settings) -> Result<()> {
        if let Some(path) = self.dictionary {
            settings.dictionary_path = path;
        }
        let index = load_index(&settings, self.semantic)?;
        match self.command {
            Commands::Analyze(args) => analyze::run(args, &index),
            Commands::Inspect => inspect::run(&index),
            Commands::Serve(args) => serve::run(args, settings, index).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match OCR text and print the detected substances as JSON.
    Analyze(analyze::Args),
    /// Print index statistics.
    Inspect,
    /// Serve the JSON API.
    Serve(serve::Args),
}

fn load_index(settings: &Settings, semantic: bool) -> Result<Arc<DictionaryIndex>> {
    let encoder = if semantic { Some(semantic_encoder()?) } else { None };
    let index = build_index(&settings.dictionary_path, settings.matching.clone(), encoder)
        .with_context(|| format!("building index from {}", settings.dictionary_path.display()))?;
    info!(stats = ?index.stats(), "index ready");
    Ok(Arc::new(index))
}

#[cfg(feature = "embeddings")]
fn semantic_encoder() -> Result<Arc<dyn Encoder>> {
    let encoder = foodlens::nlp::embeddings::FastEmbedEncoder::try_new()?;
    Ok(Arc::new(encoder))
}

#[cfg(not(feature = "embeddings"))]
fn semantic_encoder() -> Result<Arc<dyn Encoder>> {
    anyhow::bail!("semantic matching requires building with `--features embeddings`")
}
