// KeywordRecord — the unit the planning pipeline operates on.
//
// Upstream scoring produces these; the clustering core consumes them.
// Keywords are compared by text; the numbers ride along as opaque
// ranking inputs.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

use super::entities::ExtractedEntities;

/// Where a keyword came from during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Seed,
    Autosuggest,
    PeopleAlsoAsk,
    Competitor,
    Related,
}

/// A scored keyword. Metric fields are optional because providers
/// routinely return partial data; missing values rank below any present
/// value wherever ordering matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub text: String,
    /// Monthly search volume
    pub volume: Option<u64>,
    /// Cost per click in account currency
    pub cpc: Option<f64>,
    pub intent: Intent,
    /// Ranking difficulty, 0-100
    pub difficulty: Option<f64>,
    /// Estimated monthly visits at the target rank
    pub traffic_potential: Option<f64>,
    /// Composite opportunity score, 0-100
    pub opportunity: Option<f64>,
    pub source: Option<KeywordSource>,
    /// Entities mined from the keyword text
    #[serde(default, skip_serializing_if = "ExtractedEntities::is_empty")]
    pub entities: ExtractedEntities,
}

impl KeywordRecord {
    /// A record carrying only text, for callers that cluster before
    /// scoring.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            volume: None,
            cpc: None,
            intent: Intent::Informational,
            difficulty: None,
            traffic_potential: None,
            opportunity: None,
            source: None,
            entities: ExtractedEntities::default(),
        }
    }
}

/// Pick the pillar keyword for a cluster: the record with the highest
/// opportunity score. First occurrence wins on exact ties, and a missing
/// opportunity ranks below every present value — so index 0 is returned
/// only when it genuinely wins or every candidate is missing.
pub fn select_pillar(records: &[KeywordRecord]) -> usize {
    let mut best_idx = 0;
    let mut best_opportunity = f64::NEG_INFINITY;

    for (i, record) in records.iter().enumerate() {
        if let Some(opportunity) = record.opportunity {
            if opportunity > best_opportunity {
                best_opportunity = opportunity;
                best_idx = i;
            }
        }
    }

    best_idx
}
