//! Substance dictionary loading and the immutable lookup index.

pub mod dictionary;
pub mod index;

pub use dictionary::{
    load_dictionary, parse_dictionary, Category, DictionaryError, LoadedDictionary, RiskLevel,
    SubstanceEntry,
};
pub use index::{build_index, DictionaryIndex, IndexStats};
