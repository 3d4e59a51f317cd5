//! Substance dictionary model and the adapter over the ETL's JSON output.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::nlp::EncodeError;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("dictionary must be an array or an object holding a `data` array")]
    UnsupportedShape,

    #[error("failed to encode dictionary keys: {0}")]
    Encoder(#[from] EncodeError),

    #[error("invalid matching configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Additive,
    Allergen,
    #[default]
    Ingredient,
}

impl Category {
    /// Lenient parse of the ETL's category tag; unknown tags are ingredients.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "additive" | "additives" | "katkı" | "katkı maddesi" => Self::Additive,
            "allergen" | "allergens" | "alerjen" => Self::Allergen,
            _ => Self::Ingredient,
        }
    }
}

/// Curated risk label. Labels outside the known vocabulary are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
    Other(String),
}

impl RiskLevel {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        match label.to_lowercase().as_str() {
            "low" | "düşük" | "dusuk" => Self::Low,
            "medium" | "moderate" | "orta" => Self::Medium,
            "high" | "yüksek" | "yuksek" => Self::High,
            "" | "unknown" | "bilinmiyor" => Self::Unknown,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
            Self::Other(label) => label,
        };
        f.write_str(label)
    }
}

impl From<String> for RiskLevel {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.to_string()
    }
}

pub const UNKNOWN_DIETARY_STATUS: &str = "Unknown";

/// One curated food substance. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceEntry {
    pub id: String,
    pub name_primary: String,
    pub name_secondary: String,
    pub category: Category,
    pub risk_level: RiskLevel,
    pub dietary_status: String,
    pub description: String,
    /// Codes, names and spellings used for matching only; never displayed.
    pub keyword_variants: Vec<String>,
}

impl SubstanceEntry {
    pub fn new(id: impl Into<String>, name_primary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name_primary: name_primary.into(),
            name_secondary: String::new(),
            category: Category::default(),
            risk_level: RiskLevel::default(),
            dietary_status: UNKNOWN_DIETARY_STATUS.to_string(),
            description: String::new(),
            keyword_variants: Vec::new(),
        }
    }

    pub fn with_secondary_name(mut self, name: impl Into<String>) -> Self {
        self.name_secondary = name.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyword_variants.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Primary name when present, otherwise the secondary one.
    pub fn display_name(&self) -> &str {
        if self.name_primary.trim().is_empty() {
            self.name_secondary.trim()
        } else {
            self.name_primary.trim()
        }
    }

    /// An entry needs an id and at least one display name to be indexed.
    pub fn is_admissible(&self) -> bool {
        !self.id.trim().is_empty() && !self.display_name().is_empty()
    }
}

/// One substance object as written by the ETL, with every key spelling it uses.
#[derive(Debug, Deserialize)]
struct RawSubstance {
    id: Option<String>,
    name_tr: Option<String>,
    name: Option<String>,
    name_en: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    category: Option<String>,
    risk_level: Option<String>,
    dietary_status: Option<String>,
    description_tr: Option<String>,
    description: Option<String>,
    note: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawSubstance> for SubstanceEntry {
    fn from(raw: RawSubstance) -> Self {
        let category = raw
            .kind
            .or(raw.category)
            .map(|tag| Category::parse(&tag))
            .unwrap_or_default();
        let dietary_status = non_empty(raw.dietary_status)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| UNKNOWN_DIETARY_STATUS.to_string());
        Self {
            id: raw.id.unwrap_or_default().trim().to_string(),
            name_primary: non_empty(raw.name_tr).or(raw.name).unwrap_or_default(),
            name_secondary: raw.name_en.unwrap_or_default(),
            category,
            risk_level: raw
                .risk_level
                .map(|label| RiskLevel::parse(&label))
                .unwrap_or_default(),
            dietary_status,
            description: non_empty(raw.description_tr)
                .or(non_empty(raw.description))
                .or(raw.note)
                .unwrap_or_default(),
            keyword_variants: raw.keywords,
        }
    }
}

/// Strongly typed result of reading a dictionary source.
#[derive(Debug, Clone, Default)]
pub struct LoadedDictionary {
    pub entries: Vec<SubstanceEntry>,
    /// Objects that failed to deserialize or had no id or display name.
    pub skipped: usize,
}

/// Parse a dictionary document: a bare array or `{"data": [...]}`.
///
/// Individual malformed objects are skipped and counted, never fatal.
pub fn parse_dictionary(json: &str) -> Result<LoadedDictionary, DictionaryError> {
    let document: Value = serde_json::from_str(json)?;
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(DictionaryError::UnsupportedShape),
        },
        _ => return Err(DictionaryError::UnsupportedShape),
    };

    let mut loaded = LoadedDictionary::default();
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawSubstance>(item) {
            Ok(raw) => {
                let entry = SubstanceEntry::from(raw);
                if entry.is_admissible() {
                    loaded.entries.push(entry);
                } else {
                    warn!(position, id = %entry.id, "skipping entry without id or name");
                    loaded.skipped += 1;
                }
            }
            Err(err) => {
                warn!(position, %err, "skipping malformed dictionary entry");
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

/// Read and parse the dictionary file at `path`.
pub fn load_dictionary(path: &Path) -> Result<LoadedDictionary, DictionaryError> {
    let json = fs::read_to_string(path).map_err(|source| DictionaryError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = parse_dictionary(&json)?;
    info!(
        path = %path.display(),
        entries = loaded.entries.len(),
        skipped = loaded.skipped,
        "loaded substance dictionary"
    );
    Ok(loaded)
}
