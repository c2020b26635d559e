pub mod product;
pub mod recipient;
pub mod recommendation;

pub use product::{CatalogProvider, InMemoryCatalog, Product};
pub use recipient::{BudgetOverride, RecipientSnapshot, RecommendationRequest};
pub use recommendation::{
    CandidateScore, Provenance, Recommendation, RecommendationStatus, ScoreSource,
};
