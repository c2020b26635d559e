use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which scorer produced a candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Content,
    Generative,
}

/// A per-run, pre-normalization score for one product from one source.
/// Raw scores are scorer-specific and unbounded; the aggregator min-max
/// scales each source before combining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub product_id: Uuid,
    pub raw_score: f64,
    pub source: ScoreSource,
    /// Justification text carried from the generative shortlist, if any.
    pub justification: Option<String>,
}

/// Which source(s) contributed to a final recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Content,
    Generative,
    Both,
}

/// User-settable status. Owned by the persistence layer; the scoring core
/// only ever emits `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    #[default]
    Pending,
    Approved,
    Dismissed,
}

/// One ranked recommendation, ready for persistence. Never mutated by the
/// core after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: Uuid,
    pub product_name: String,
    pub price: f64,
    /// Normalized score in [0, 1].
    pub score: f64,
    pub reasoning: String,
    pub sources: Provenance,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
}
