//! Lookup data for relationship profiling.
//!
//! Both tables are immutable after construction and injected into the
//! profiler, so tests can override entries without touching global state.

use std::collections::HashMap;

use crate::profile::profiler::{
    BudgetRange, EmotionalConnection, FormalityLevel, IntimacyLevel,
};

/// Default profile tuple for one canonical relationship label.
#[derive(Debug, Clone)]
pub struct RelationshipDefaults {
    pub intimacy: IntimacyLevel,
    pub formality: FormalityLevel,
    pub emotional_connection: EmotionalConnection,
    pub budget: BudgetRange,
}

impl RelationshipDefaults {
    fn new(
        intimacy: IntimacyLevel,
        formality: FormalityLevel,
        emotional_connection: EmotionalConnection,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            intimacy,
            formality,
            emotional_connection,
            budget: BudgetRange { min, max },
        }
    }
}

/// Canonical relationship label → default profile tuple.
///
/// Labels that match no entry (after normalization) resolve to the
/// acquaintance fallback: casual / neutral / medium / $25–$75.
#[derive(Debug, Clone)]
pub struct RelationshipTable {
    entries: HashMap<String, RelationshipDefaults>,
    fallback: RelationshipDefaults,
}

impl RelationshipTable {
    pub fn new(entries: HashMap<String, RelationshipDefaults>) -> Self {
        Self {
            entries,
            fallback: acquaintance_defaults(),
        }
    }

    /// Looks up an already-normalized label; `None` means "use the fallback".
    pub fn get(&self, normalized_label: &str) -> Option<&RelationshipDefaults> {
        self.entries.get(normalized_label)
    }

    pub fn contains(&self, normalized_label: &str) -> bool {
        self.entries.contains_key(normalized_label)
    }

    pub fn fallback(&self) -> &RelationshipDefaults {
        &self.fallback
    }
}

fn acquaintance_defaults() -> RelationshipDefaults {
    RelationshipDefaults::new(
        IntimacyLevel::Casual,
        FormalityLevel::Neutral,
        EmotionalConnection::Medium,
        25.0,
        75.0,
    )
}

impl Default for RelationshipTable {
    fn default() -> Self {
        use EmotionalConnection as E;
        use FormalityLevel as F;
        use IntimacyLevel as I;

        let mut entries = HashMap::new();
        let mut add = |labels: &[&str], defaults: RelationshipDefaults| {
            for label in labels {
                entries.insert(label.to_string(), defaults.clone());
            }
        };

        add(
            &["spouse", "husband", "wife", "partner", "boyfriend", "girlfriend", "fiance", "fiancee"],
            RelationshipDefaults::new(I::VeryClose, F::Casual, E::High, 50.0, 300.0),
        );
        add(
            &["parent", "mother", "mom", "father", "dad"],
            RelationshipDefaults::new(I::VeryClose, F::Neutral, E::High, 40.0, 200.0),
        );
        add(
            &["sibling", "sister", "brother"],
            RelationshipDefaults::new(I::Close, F::Casual, E::High, 30.0, 150.0),
        );
        add(
            &["child", "son", "daughter"],
            RelationshipDefaults::new(I::VeryClose, F::Casual, E::High, 25.0, 150.0),
        );
        add(
            &["grandparent", "grandmother", "grandfather", "grandma", "grandpa"],
            RelationshipDefaults::new(I::Close, F::Neutral, E::High, 30.0, 150.0),
        );
        add(
            &["friend", "best friend"],
            RelationshipDefaults::new(I::Close, F::Casual, E::Medium, 25.0, 100.0),
        );
        add(
            &["colleague", "coworker", "co-worker"],
            RelationshipDefaults::new(I::Casual, F::Formal, E::Low, 20.0, 75.0),
        );
        add(
            &["boss", "manager"],
            RelationshipDefaults::new(I::Distant, F::Formal, E::Low, 25.0, 100.0),
        );
        add(
            &["mentor", "teacher"],
            RelationshipDefaults::new(I::Close, F::Formal, E::Medium, 30.0, 120.0),
        );
        add(
            &["neighbor", "neighbour"],
            RelationshipDefaults::new(I::Casual, F::Neutral, E::Low, 15.0, 50.0),
        );
        add(&["acquaintance"], acquaintance_defaults());

        Self::new(entries)
    }
}

/// Curated keyword → interest tag dictionary for free-text note scanning.
/// Words with no entry are ignored — note scanning never fails.
#[derive(Debug, Clone)]
pub struct InterestLexicon {
    entries: HashMap<String, String>,
}

impl InterestLexicon {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn tag_for(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }
}

impl Default for InterestLexicon {
    fn default() -> Self {
        let pairs: &[(&str, &str)] = &[
            ("yoga", "wellness"),
            ("meditation", "wellness"),
            ("spa", "wellness"),
            ("running", "fitness"),
            ("gym", "fitness"),
            ("cycling", "fitness"),
            ("hiking", "outdoors"),
            ("camping", "outdoors"),
            ("fishing", "outdoors"),
            ("gardening", "gardening"),
            ("plants", "gardening"),
            ("coffee", "food_beverage"),
            ("tea", "food_beverage"),
            ("wine", "food_beverage"),
            ("whiskey", "food_beverage"),
            ("chocolate", "food_beverage"),
            ("cooking", "kitchen"),
            ("baking", "kitchen"),
            ("reading", "books"),
            ("books", "books"),
            ("novels", "books"),
            ("poetry", "books"),
            ("gaming", "gaming"),
            ("videogames", "gaming"),
            ("chess", "gaming"),
            ("music", "music"),
            ("vinyl", "music"),
            ("guitar", "music"),
            ("piano", "music"),
            ("art", "art"),
            ("painting", "art"),
            ("drawing", "art"),
            ("photography", "art"),
            ("tech", "tech"),
            ("gadgets", "tech"),
            ("coding", "tech"),
            ("travel", "travel"),
            ("languages", "travel"),
            ("fashion", "fashion"),
            ("jewelry", "fashion"),
            ("soccer", "sports"),
            ("football", "sports"),
            ("basketball", "sports"),
            ("knitting", "crafts"),
            ("sewing", "crafts"),
            ("crafts", "crafts"),
        ];
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
