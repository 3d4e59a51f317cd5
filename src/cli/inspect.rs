//! CLI entry-point for printing index statistics.

use anyhow::Result;

use foodlens::data::DictionaryIndex;

pub fn run(index: &DictionaryIndex) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&index.stats())?);
    Ok(())
}
