//! First-seen deduplication of fragment matches into result records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::{Category, RiskLevel};
use crate::matching::{MatchCandidate, Strategy};

/// One detected substance as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub risk_level: RiskLevel,
    pub dietary_status: String,
    pub description: String,
    pub match_score: u8,
    pub match_strategy: Strategy,
    pub detected_keyword: String,
}

impl From<&MatchCandidate<'_>> for ResultRecord {
    fn from(candidate: &MatchCandidate<'_>) -> Self {
        let entry = candidate.entry;
        Self {
            id: entry.id.clone(),
            name: entry.display_name().to_string(),
            category: entry.category,
            risk_level: entry.risk_level.clone(),
            dietary_status: entry.dietary_status.clone(),
            description: entry.description.clone(),
            match_score: candidate.score.round().clamp(0.0, 100.0) as u8,
            match_strategy: candidate.strategy,
            detected_keyword: candidate.key.to_string(),
        }
    }
}

/// Collapse per-fragment matches into records, one per substance id.
///
/// Input order is fragment order; the first match of a substance wins and
/// later ones are dropped. Output keeps first-seen order, not score order.
pub fn aggregate<'a, I>(candidates: I) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = Option<MatchCandidate<'a>>>,
{
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut records = Vec::new();
    for candidate in candidates.into_iter().flatten() {
        if seen.insert(candidate.entry.id.as_str()) {
            records.push(ResultRecord::from(&candidate));
        }
    }
    records
}
