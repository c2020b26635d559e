use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::IntimacyLevel;

/// Immutable view of a recipient taken at the start of a recommendation run.
/// The run never re-reads the recipient; edits made mid-run are not seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientSnapshot {
    pub id: Uuid,
    pub name: String,
    /// Free-form relationship label, e.g. "sister" or "colleague".
    pub relationship: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Free-text notes scanned for interest keywords.
    pub notes: Option<String>,
}

/// Caller-supplied budget bounds. Widens the inferred range, never narrows it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetOverride {
    pub min: f64,
    pub max: f64,
}

/// One recommendation run's input, assembled by the service layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub recipient: RecipientSnapshot,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub budget_override: Option<BudgetOverride>,
    /// Explicit closeness override — always wins over label inference.
    pub closeness: Option<IntimacyLevel>,
    pub years_known: Option<u32>,
    pub result_limit: Option<usize>,
}

impl RecommendationRequest {
    /// Minimal request: recipient only, everything else defaulted.
    pub fn for_recipient(recipient: RecipientSnapshot) -> Self {
        Self {
            recipient,
            occasion: None,
            mood: None,
            budget_override: None,
            closeness: None,
            years_known: None,
            result_limit: None,
        }
    }
}
