pub mod profiler;
pub mod tables;

pub use profiler::{
    BudgetRange, EmotionalConnection, FormalityLevel, IntimacyLevel, RelationshipProfile,
    RelationshipProfiler,
};
pub use tables::{InterestLexicon, RelationshipDefaults, RelationshipTable};
