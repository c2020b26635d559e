//! Relationship profiling — derives a structured profile from sparse
//! recipient fields. Pure, deterministic, no I/O.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{BudgetOverride, RecipientSnapshot};
use crate::profile::tables::{InterestLexicon, RelationshipTable};

/// Years known at which intimacy is bumped one level (absent an explicit
/// closeness override).
const LONG_RELATIONSHIP_YEARS: u32 = 10;

/// How close the relationship is. Ordinal — ordering is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntimacyLevel {
    Distant,
    Casual,
    Close,
    VeryClose,
}

impl IntimacyLevel {
    /// The next level up; saturates at `VeryClose`.
    pub fn bumped(self) -> Self {
        match self {
            IntimacyLevel::Distant => IntimacyLevel::Casual,
            IntimacyLevel::Casual => IntimacyLevel::Close,
            IntimacyLevel::Close | IntimacyLevel::VeryClose => IntimacyLevel::VeryClose,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntimacyLevel::Distant => "distant",
            IntimacyLevel::Casual => "casual",
            IntimacyLevel::Close => "close",
            IntimacyLevel::VeryClose => "very close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormalityLevel {
    Casual,
    Neutral,
    Formal,
}

impl FormalityLevel {
    pub fn label(self) -> &'static str {
        match self {
            FormalityLevel::Casual => "casual",
            FormalityLevel::Neutral => "neutral",
            FormalityLevel::Formal => "formal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalConnection {
    Low,
    Medium,
    High,
}

/// Inclusive budget bounds for the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Widens (never narrows) the range to cover an explicit override.
    pub fn widened(&self, override_range: &BudgetOverride) -> BudgetRange {
        BudgetRange {
            min: self.min.min(override_range.min),
            max: self.max.max(override_range.max),
        }
    }
}

/// Derived relationship profile for one run. Not persisted independently.
/// Every field is always populated — unknown labels fall back to the
/// acquaintance default rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipProfile {
    pub intimacy: IntimacyLevel,
    pub formality: FormalityLevel,
    pub emotional_connection: EmotionalConnection,
    pub budget: BudgetRange,
    /// Interest tags inferred from the recipient's notes. BTreeSet keeps
    /// iteration order deterministic across runs.
    pub interest_tags: BTreeSet<String>,
}

/// Derives relationship profiles from recipient snapshots. Holds immutable
/// lookup tables injected at construction — no global state.
#[derive(Debug, Clone, Default)]
pub struct RelationshipProfiler {
    table: RelationshipTable,
    lexicon: InterestLexicon,
}

impl RelationshipProfiler {
    pub fn new(table: RelationshipTable, lexicon: InterestLexicon) -> Self {
        Self { table, lexicon }
    }

    /// Builds the profile for one recipient.
    ///
    /// An explicit `closeness` override always wins over label inference;
    /// otherwise a long-known relationship bumps intimacy one level. A
    /// caller-supplied budget override widens the inferred range, never
    /// narrows it.
    pub fn profile(
        &self,
        recipient: &RecipientSnapshot,
        closeness: Option<IntimacyLevel>,
        years_known: Option<u32>,
        budget_override: Option<&BudgetOverride>,
    ) -> RelationshipProfile {
        let normalized = normalize_label(&recipient.relationship, &self.table);
        let defaults = self
            .table
            .get(&normalized)
            .unwrap_or_else(|| self.table.fallback());

        let intimacy = match closeness {
            Some(level) => level,
            None if years_known.unwrap_or(0) >= LONG_RELATIONSHIP_YEARS => {
                defaults.intimacy.bumped()
            }
            None => defaults.intimacy,
        };

        let budget = match budget_override {
            Some(range) => defaults.budget.widened(range),
            None => defaults.budget,
        };

        let interest_tags = recipient
            .notes
            .as_deref()
            .map(|notes| self.scan_notes(notes))
            .unwrap_or_default();

        RelationshipProfile {
            intimacy,
            formality: defaults.formality,
            emotional_connection: defaults.emotional_connection,
            budget,
            interest_tags,
        }
    }

    /// Scans free-text notes against the lexicon. Unmatched words are
    /// ignored — this never errors.
    fn scan_notes(&self, notes: &str) -> BTreeSet<String> {
        notes
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter_map(|word| self.lexicon.tag_for(&word.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

/// Normalizes a free-form relationship label for table lookup: case-fold,
/// trim, collapse inner whitespace, and collapse plurals ("sisters" →
/// "sister") only when the plural form itself has no entry.
fn normalize_label(raw: &str, table: &RelationshipTable) -> String {
    let folded = raw
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if table.contains(&folded) {
        return folded;
    }
    for suffix in ["es", "s"] {
        if let Some(stripped) = folded.strip_suffix(suffix) {
            if table.contains(stripped) {
                return stripped.to_string();
            }
        }
    }
    folded
}
