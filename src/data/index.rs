//! Immutable lookup structure built once from the substance dictionary.

use std::{fmt, path::Path, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MatchConfig;
use crate::data::dictionary::{load_dictionary, DictionaryError, SubstanceEntry};
use crate::nlp::{
    normalize::{key_len, normalize},
    Encoder,
};

static ADDITIVE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^e(\d{3,4}[a-z]?)$").expect("valid regex"));

/// Counters describing how the index was assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub skipped_entries: usize,
    pub keys: usize,
    /// Keys claimed by more than one substance; the later substance won.
    pub collisions: usize,
    pub vectors: usize,
}

/// Normalized key → substance lookup plus the ordered lexical search
/// universe and, when an encoder is configured, one vector per key.
///
/// Keys keep the position of their first registration, so iteration order
/// is builder insertion order and ties resolve deterministically.
pub struct DictionaryIndex {
    entries: Vec<SubstanceEntry>,
    keys: IndexMap<String, usize>,
    vectors: Option<Vec<Vec<f32>>>,
    encoder: Option<Arc<dyn Encoder>>,
    config: MatchConfig,
    stats: IndexStats,
}

impl fmt::Debug for DictionaryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryIndex")
            .field("stats", &self.stats)
            .field("semantic", &self.encoder.is_some())
            .finish_non_exhaustive()
    }
}

/// Every raw string that should resolve to `entry`, before normalization.
fn candidate_keywords(entry: &SubstanceEntry) -> Vec<String> {
    let mut candidates = vec![
        entry.id.clone(),
        entry.name_primary.clone(),
        entry.name_secondary.clone(),
    ];
    candidates.extend(entry.keyword_variants.iter().cloned());

    let compact_id: String = normalize(&entry.id)
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    if let Some(code) = ADDITIVE_CODE.captures(&compact_id) {
        candidates.push(format!("e{}", &code[1]));
        candidates.push(format!("e-{}", &code[1]));
        candidates.push(format!("e {}", &code[1]));
    }
    candidates
}

impl DictionaryIndex {
    /// Build a lexical-only index.
    pub fn build(
        entries: Vec<SubstanceEntry>,
        config: MatchConfig,
    ) -> Result<Self, DictionaryError> {
        Self::assemble(entries, config, None)
    }

    /// Build an index whose keys also carry vectors from `encoder`.
    pub fn build_with_encoder(
        entries: Vec<SubstanceEntry>,
        config: MatchConfig,
        encoder: Arc<dyn Encoder>,
    ) -> Result<Self, DictionaryError> {
        Self::assemble(entries, config, Some(encoder))
    }

    fn assemble(
        entries: Vec<SubstanceEntry>,
        config: MatchConfig,
        encoder: Option<Arc<dyn Encoder>>,
    ) -> Result<Self, DictionaryError> {
        config.validate()?;

        let mut stats = IndexStats::default();
        let mut admitted: Vec<SubstanceEntry> = Vec::with_capacity(entries.len());
        let mut keys: IndexMap<String, usize> = IndexMap::new();

        for entry in entries {
            if !entry.is_admissible() {
                warn!(id = %entry.id, "excluding entry without a display name");
                stats.skipped_entries += 1;
                continue;
            }
            let position = admitted.len();
            let normalized: IndexSet<String> = candidate_keywords(&entry)
                .iter()
                .map(|raw| normalize(raw))
                .filter(|key| key_len(key) >= config.min_key_length)
                .collect();

            for key in normalized {
                if let Some(previous) = keys.insert(key.clone(), position) {
                    if previous != position {
                        warn!(
                            %key,
                            previous = %admitted[previous].id,
                            current = %entry.id,
                            "keyword collision; later entry wins"
                        );
                        stats.collisions += 1;
                    }
                }
            }
            admitted.push(entry);
        }

        let vectors = match &encoder {
            Some(encoder) => Some(encode_keys(encoder.as_ref(), &keys, config.embed_batch_size)?),
            None => None,
        };

        stats.entries = admitted.len();
        stats.keys = keys.len();
        stats.vectors = vectors.as_ref().map_or(0, Vec::len);
        info!(
            entries = stats.entries,
            keys = stats.keys,
            collisions = stats.collisions,
            vectors = stats.vectors,
            "built dictionary index"
        );

        Ok(Self {
            entries: admitted,
            keys,
            vectors,
            encoder,
            config,
            stats,
        })
    }

    /// Substance registered under an exact normalized key.
    pub fn lookup(&self, key: &str) -> Option<&SubstanceEntry> {
        self.keys.get(key).map(|&position| &self.entries[position])
    }

    /// Stored key and substance for an exact normalized key.
    pub fn get(&self, key: &str) -> Option<(&str, &SubstanceEntry)> {
        self.keys
            .get_key_value(key)
            .map(|(stored, &position)| (stored.as_str(), &self.entries[position]))
    }

    /// Lexical search universe in insertion order.
    pub fn universe(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.keys().map(String::as_str)
    }

    /// Key and substance at a universe position.
    pub fn key_at(&self, position: usize) -> Option<(&str, &SubstanceEntry)> {
        self.keys
            .get_index(position)
            .map(|(key, &entry)| (key.as_str(), &self.entries[entry]))
    }

    /// Key vectors, parallel to [`Self::universe`].
    pub fn vectors(&self) -> Option<&[Vec<f32>]> {
        self.vectors.as_deref()
    }

    pub fn encoder(&self) -> Option<&dyn Encoder> {
        self.encoder.as_deref()
    }

    pub fn entries(&self) -> &[SubstanceEntry] {
        &self.entries
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn encode_keys(
    encoder: &dyn Encoder,
    keys: &IndexMap<String, usize>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, DictionaryError> {
    let all: Vec<String> = keys.keys().cloned().collect();
    let mut vectors = Vec::with_capacity(all.len());
    for batch in all.chunks(batch_size.max(1)) {
        let encoded = encoder.encode_batch(batch)?;
        if encoded.len() != batch.len() {
            return Err(crate::nlp::EncodeError::CountMismatch {
                expected: batch.len(),
                got: encoded.len(),
            }
            .into());
        }
        vectors.extend(encoded);
    }
    Ok(vectors)
}

/// Load the dictionary at `path` and build the index from it.
///
/// Fails with [`DictionaryError::Unavailable`] when the file cannot be read.
pub fn build_index(
    path: &Path,
    config: MatchConfig,
    encoder: Option<Arc<dyn Encoder>>,
) -> Result<DictionaryIndex, DictionaryError> {
    let loaded = load_dictionary(path)?;
    let mut index = DictionaryIndex::assemble(loaded.entries, config, encoder)?;
    index.stats.skipped_entries += loaded.skipped;
    Ok(index)
}
