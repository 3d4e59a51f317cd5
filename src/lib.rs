//! Matching engine that finds curated food substances in noisy OCR
//! ingredient declarations.
//!
//! Build a [`DictionaryIndex`] once, share it, and call [`analyze`] per text.

pub mod api;
pub mod config;
pub mod data;
pub mod logging;
pub mod matching;
pub mod nlp;

pub use config::{MatchConfig, Settings};
pub use data::{build_index, DictionaryError, DictionaryIndex, SubstanceEntry};
pub use matching::{analyze, MatchCandidate, Matcher, ResultRecord, Strategy};
