//! Gift recommendation engine.
//!
//! Turns a recipient snapshot plus a product catalog into a ranked,
//! deduplicated, size-bounded list of gift recommendations. Two candidate
//! sources feed one aggregator: a deterministic content scorer over catalog
//! metadata, and an optional LLM-produced shortlist matched back against the
//! real catalog. The LLM path is best-effort — on timeout or malformed
//! output the run degrades to content-only results with a warning.
//!
//! This crate owns no HTTP routes, storage, or sessions. The surrounding
//! service layer supplies the catalog (via [`models::CatalogProvider`]) and
//! persists the output.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod profile;
pub mod recommend;

pub use config::{EngineSettings, GenerativeConfig};
pub use errors::{EngineError, EngineResult};
pub use models::{
    CatalogProvider, InMemoryCatalog, Product, RecipientSnapshot, Recommendation,
    RecommendationRequest,
};
pub use recommend::engine::{RecommendationEngine, RecommendationOutcome};
