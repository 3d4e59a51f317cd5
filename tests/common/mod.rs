#![allow(dead_code)]

use std::collections::HashMap;

use foodlens::{
    data::{Category, RiskLevel},
    nlp::{EncodeError, Encoder},
    DictionaryIndex, MatchConfig, SubstanceEntry,
};

/// Small dictionary mirroring the ETL output for common snack labels.
pub fn entries() -> Vec<SubstanceEntry> {
    vec![
        SubstanceEntry::new("E621", "Monosodyum glutamat")
            .with_secondary_name("Monosodium glutamate")
            .with_category(Category::Additive)
            .with_risk_level(RiskLevel::Medium)
            .with_keywords(["msg"]),
        SubstanceEntry::new("E631", "Disodyum inosinat")
            .with_secondary_name("Disodium inosinate")
            .with_category(Category::Additive),
        SubstanceEntry::new("E202", "Potasyum sorbat")
            .with_secondary_name("Potassium sorbate")
            .with_category(Category::Additive)
            .with_risk_level(RiskLevel::Low)
            .with_keywords(["potasyum sorbat"]),
        SubstanceEntry::new("E951", "Aspartam")
            .with_secondary_name("Aspartame")
            .with_category(Category::Additive),
        SubstanceEntry::new("milk", "Süt")
            .with_secondary_name("Milk")
            .with_category(Category::Allergen),
    ]
}

pub fn index() -> DictionaryIndex {
    DictionaryIndex::build(entries(), MatchConfig::default()).expect("index builds")
}

/// Table-driven encoder: known strings get fixed vectors, anything else the
/// zero vector, which is never similar to anything.
pub struct StubEncoder {
    table: HashMap<String, Vec<f32>>,
    dims: usize,
}

impl StubEncoder {
    pub fn new(table: &[(&str, &[f32])]) -> Self {
        let dims = table.first().map_or(1, |(_, v)| v.len());
        Self {
            table: table
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                .collect(),
            dims,
        }
    }
}

impl Encoder for StubEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncodeError> {
        Ok(texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dims])
            })
            .collect())
    }
}

/// Encoder that always fails, for degradation paths.
pub struct BrokenEncoder;

impl Encoder for BrokenEncoder {
    fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EncodeError> {
        Err(EncodeError::InferenceFailed {
            reason: "offline".to_string(),
        })
    }
}
