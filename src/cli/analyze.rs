//! CLI entry-point for matching a single OCR text.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use foodlens::{api::types::AnalyzeResponse, data::DictionaryIndex, matching};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// OCR text to analyze; read from stdin when omitted.
    pub text: Option<String>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[instrument(skip(index))]
pub fn run(args: Args, index: &DictionaryIndex) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading OCR text from stdin")?;
            buffer
        }
    };
    let response = AnalyzeResponse {
        results: matching::analyze(index, &text),
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}
