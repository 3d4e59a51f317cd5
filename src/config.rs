//! Runtime configuration utilities for foodlens.

use std::{env, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header tokens that open an ingredient declaration, including the OCR
/// misreadings seen on Turkish and English packaging.
pub const DEFAULT_HEADER_TOKENS: &[&str] = &[
    "içindekiler",
    "icindekiler",
    "ıcındekıler",
    "lcindekiler",
    "içerik",
    "icerik",
    "bileşenler",
    "bilesenler",
    "ingredients",
    "ingredient",
    "ingridients",
    "ingedients",
    "indigients",
    "zutaten",
];

/// Thresholds and limits shared by the index builder, segmenter and matcher.
///
/// Scores are on a 0-100 scale regardless of the strategy producing them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Normalized keys and fragments shorter than this (in characters) are ignored.
    pub min_key_length: usize,
    /// Fragments longer than this (in characters) are treated as non-ingredient text.
    pub max_fragment_length: usize,
    /// Number of `.` terminators after the header that close the declaration.
    pub terminator_bound: usize,
    /// Lexical score accepted without consulting the semantic tier.
    pub lexical_high_threshold: f64,
    /// Lexical score accepted when the semantic tier declines.
    pub lexical_fallback_threshold: f64,
    /// Minimum scaled cosine similarity for a semantic match.
    pub semantic_threshold: f64,
    /// Keys encoded per encoder call while building the index.
    pub embed_batch_size: usize,
    /// Tokens marking the start of the declaration, matched case-insensitively.
    pub header_tokens: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_key_length: 2,
            max_fragment_length: 50,
            terminator_bound: 4,
            lexical_high_threshold: 90.0,
            lexical_fallback_threshold: 85.0,
            semantic_threshold: 75.0,
            embed_batch_size: 256,
            header_tokens: DEFAULT_HEADER_TOKENS
                .iter()
                .map(|token| token.to_string())
                .collect(),
        }
    }
}

/// Rejected threshold combination.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must lie within 0..=100, got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("lexical fallback threshold {fallback} exceeds high threshold {high}")]
    FallbackAboveHigh { fallback: f64, high: f64 },

    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

impl MatchConfig {
    /// Check that the thresholds describe a usable decision ladder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("lexical_high_threshold", self.lexical_high_threshold),
            ("lexical_fallback_threshold", self.lexical_fallback_threshold),
            ("semantic_threshold", self.semantic_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        if self.lexical_fallback_threshold > self.lexical_high_threshold {
            return Err(ConfigError::FallbackAboveHigh {
                fallback: self.lexical_fallback_threshold,
                high: self.lexical_high_threshold,
            });
        }
        for (name, value) in [
            ("min_key_length", self.min_key_length),
            ("max_fragment_length", self.max_fragment_length),
            ("terminator_bound", self.terminator_bound),
            ("embed_batch_size", self.embed_batch_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }
        Ok(())
    }

    /// Apply `FOODLENS_*` environment overrides on top of the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_key_length: env_or("FOODLENS_MIN_KEY_LENGTH", defaults.min_key_length),
            max_fragment_length: env_or(
                "FOODLENS_MAX_FRAGMENT_LENGTH",
                defaults.max_fragment_length,
            ),
            terminator_bound: env_or("FOODLENS_TERMINATOR_BOUND", defaults.terminator_bound),
            lexical_high_threshold: env_or("FOODLENS_LEXICAL_HIGH", defaults.lexical_high_threshold),
            lexical_fallback_threshold: env_or(
                "FOODLENS_LEXICAL_FALLBACK",
                defaults.lexical_fallback_threshold,
            ),
            semantic_threshold: env_or(
                "FOODLENS_SEMANTIC_THRESHOLD",
                defaults.semantic_threshold,
            ),
            embed_batch_size: env_or("FOODLENS_EMBED_BATCH_SIZE", defaults.embed_batch_size),
            header_tokens: defaults.header_tokens,
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// JSON dictionary produced by the ETL step.
    pub dictionary_path: PathBuf,
    /// Bind host for the HTTP shell.
    pub host: String,
    /// Bind port for the HTTP shell.
    pub port: u16,
    /// Matching thresholds.
    pub matching: MatchConfig,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let dictionary_path = env::var("FOODLENS_DICTIONARY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/foodlens_ai_completed.json"));
        let host = env::var("FOODLENS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("FOODLENS_PORT", 8080);
        let matching = MatchConfig::from_env();
        matching.validate()?;

        Ok(Self {
            dictionary_path,
            host,
            port,
            matching,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
