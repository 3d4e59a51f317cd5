//! Layered fragment matching and the `analyze` entry point.
//!
//! Decision ladder per fragment:
//!
//! 1. exact normalized key → `exact`, score 100, no further work (retried
//!    with `ı` read as `i` so upper-case Latin text meets mixed-case keys);
//! 2. best lexical score ≥ `lexical_high_threshold` → `lexical`;
//! 3. best semantic score ≥ `semantic_threshold` → `semantic` (encoder only);
//! 4. best lexical score ≥ `lexical_fallback_threshold` → `lexical`;
//! 5. otherwise no match.
//!
//! Equal scores keep the key registered first in the index.

pub mod aggregate;

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use aggregate::{aggregate, ResultRecord};

use crate::data::{DictionaryIndex, SubstanceEntry};
use crate::nlp::{
    embeddings::cosine_score,
    normalize::{key_len, merge_dotless_i, normalize},
    segment, StringSimilarity, TokenSetRatio,
};

static DEFAULT_SIMILARITY: TokenSetRatio = TokenSetRatio;

/// Tier that accepted a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Exact,
    Lexical,
    Semantic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
        })
    }
}

/// Accepted match for one fragment. Borrows from the index it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    pub entry: &'a SubstanceEntry,
    /// Normalized dictionary key that produced the match.
    pub key: &'a str,
    pub strategy: Strategy,
    /// 0-100 regardless of strategy.
    pub score: f64,
}

/// Matches fragments against a shared [`DictionaryIndex`].
///
/// Holds no mutable state; one matcher can serve any number of threads.
#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    index: &'a DictionaryIndex,
    similarity: &'a dyn StringSimilarity,
}

impl<'a> Matcher<'a> {
    /// Matcher using [`TokenSetRatio`] for the lexical tiers.
    pub fn new(index: &'a DictionaryIndex) -> Self {
        Self {
            index,
            similarity: &DEFAULT_SIMILARITY,
        }
    }

    pub fn with_similarity(
        index: &'a DictionaryIndex,
        similarity: &'a dyn StringSimilarity,
    ) -> Self {
        Self { index, similarity }
    }

    /// Best accepted match for `fragment`, if any tier accepts one.
    pub fn match_fragment(&self, fragment: &str) -> Option<MatchCandidate<'a>> {
        let config = self.index.config();
        let query = normalize(fragment);
        if key_len(&query) < config.min_key_length {
            return None;
        }

        let exact = self
            .index
            .get(&query)
            .or_else(|| match merge_dotless_i(&query) {
                Cow::Owned(merged) => self.index.get(&merged),
                Cow::Borrowed(_) => None,
            });
        if let Some((key, entry)) = exact {
            debug!(%query, id = %entry.id, "exact match");
            return Some(MatchCandidate {
                entry,
                key,
                strategy: Strategy::Exact,
                score: 100.0,
            });
        }

        let lexical = self.best_lexical(&query);
        if let Some((position, score)) = lexical {
            if score >= config.lexical_high_threshold {
                return self.accept(position, Strategy::Lexical, score, &query);
            }
        }

        if let Some((position, score)) = self.best_semantic(&query) {
            if score >= config.semantic_threshold {
                return self.accept(position, Strategy::Semantic, score, &query);
            }
        }

        if let Some((position, score)) = lexical {
            if score >= config.lexical_fallback_threshold {
                return self.accept(position, Strategy::Lexical, score, &query);
            }
        }

        debug!(%query, best_lexical = ?lexical.map(|(_, s)| s), "no match");
        None
    }

    /// Segment `raw_text`, match every fragment and aggregate the results.
    pub fn analyze(&self, raw_text: &str) -> Vec<ResultRecord> {
        let fragments = segment(raw_text, self.index.config());
        aggregate(fragments.iter().map(|fragment| self.match_fragment(fragment)))
    }

    fn accept(
        &self,
        position: usize,
        strategy: Strategy,
        score: f64,
        query: &str,
    ) -> Option<MatchCandidate<'a>> {
        let (key, entry) = self.index.key_at(position)?;
        debug!(%query, %key, id = %entry.id, %strategy, score, "fuzzy match");
        Some(MatchCandidate {
            entry,
            key,
            strategy,
            score,
        })
    }

    /// Highest lexical score over the search universe as `(position, score)`.
    ///
    /// Keys whose length alone keeps them under the fallback threshold are
    /// skipped; they could never be accepted.
    fn best_lexical(&self, query: &str) -> Option<(usize, f64)> {
        let config = self.index.config();
        let floor = config
            .lexical_fallback_threshold
            .min(config.lexical_high_threshold);
        let query_len = key_len(query);

        let mut best: Option<(usize, f64)> = None;
        for (position, key) in self.index.universe().enumerate() {
            if self.similarity.upper_bound(query_len, key_len(key)) < floor {
                continue;
            }
            let score = self.similarity.score(query, key);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((position, score));
            }
        }
        best
    }

    /// Highest scaled cosine similarity against the key vectors.
    fn best_semantic(&self, query: &str) -> Option<(usize, f64)> {
        let encoder = self.index.encoder()?;
        let vectors = self.index.vectors()?;
        let query_vector = match encoder.encode(query) {
            Ok(vector) => vector,
            Err(err) => {
                warn!(%query, %err, "encoder failed; skipping semantic tier");
                return None;
            }
        };

        let mut best: Option<(usize, f64)> = None;
        for (position, vector) in vectors.iter().enumerate() {
            let score = cosine_score(&query_vector, vector);
            if !score.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((position, score));
            }
        }
        best
    }
}

/// Run the whole pipeline against `index` with the default lexical scorer.
///
/// Never fails: unmatched or degenerate input yields an empty list.
pub fn analyze(index: &DictionaryIndex, raw_text: &str) -> Vec<ResultRecord> {
    Matcher::new(index).analyze(raw_text)
}
