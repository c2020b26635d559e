//! Recommendation engine — orchestrates one synchronous run.
//!
//! Flow: validate → snapshot catalog → profile → filter → content score →
//!       generative shortlist (soft-fail) → aggregate → outcome.
//!
//! Runs share no mutable state; each operates on the immutable snapshot
//! passed in, so runs for different recipients execute concurrently without
//! coordination. Persistence belongs to the caller.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::{EngineSettings, GenerativeConfig};
use crate::errors::{EngineError, EngineResult};
use crate::models::{CatalogProvider, Recommendation, RecommendationRequest};
use crate::profile::RelationshipProfiler;
use crate::recommend::aggregator::aggregate;
use crate::recommend::content::{score_products, ContentWeights};
use crate::recommend::filter::{filter_catalog, FilterSettings};
use crate::recommend::generative::{GenerativeBackend, GenerativeRecommender, LlmBackend};

/// Output of one run: a ranked list (possibly empty only when the catalog
/// itself was empty) plus warnings explaining any degraded source.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<String>,
}

/// The recommendation engine. Construct once, run many times.
pub struct RecommendationEngine {
    profiler: RelationshipProfiler,
    catalog_provider: Arc<dyn CatalogProvider>,
    generative: GenerativeRecommender,
    settings: EngineSettings,
    content_weights: ContentWeights,
}

impl RecommendationEngine {
    /// Engine wired to the production LLM backend.
    pub fn new(
        catalog_provider: Arc<dyn CatalogProvider>,
        config: GenerativeConfig,
        settings: EngineSettings,
    ) -> Self {
        let backend: Arc<dyn GenerativeBackend> = Arc::new(LlmBackend::new(config.clone()));
        Self::with_backend(catalog_provider, backend, &config, settings)
    }

    /// Engine with an explicit generative backend — the seam tests use.
    pub fn with_backend(
        catalog_provider: Arc<dyn CatalogProvider>,
        backend: Arc<dyn GenerativeBackend>,
        config: &GenerativeConfig,
        settings: EngineSettings,
    ) -> Self {
        let generative = GenerativeRecommender::new(backend, config, &settings);
        Self {
            profiler: RelationshipProfiler::default(),
            catalog_provider,
            generative,
            settings,
            content_weights: ContentWeights::default(),
        }
    }

    /// Replaces the profiler's lookup tables (test-time overrides).
    pub fn with_profiler(mut self, profiler: RelationshipProfiler) -> Self {
        self.profiler = profiler;
        self
    }

    /// Runs one recommendation pass for one recipient.
    ///
    /// Input errors reject the run; generative trouble degrades it. The
    /// caller always gets a list plus warnings otherwise.
    pub async fn run(&self, request: RecommendationRequest) -> EngineResult<RecommendationOutcome> {
        validate(&request)?;

        let catalog = self
            .catalog_provider
            .catalog()
            .await
            .map_err(EngineError::Internal)?;

        let mut warnings: Vec<String> = Vec::new();

        if catalog.is_empty() {
            warnings.push("catalog is empty; no recommendations possible".to_string());
            return Ok(RecommendationOutcome {
                recommendations: Vec::new(),
                warnings,
            });
        }

        let recipient = &request.recipient;
        let occasion = request.occasion.as_deref();
        let mood = request.mood.as_deref();
        let limit = request.result_limit.unwrap_or(self.settings.result_limit);

        let profile = self.profiler.profile(
            recipient,
            request.closeness,
            request.years_known,
            request.budget_override.as_ref(),
        );
        info!(
            "run for recipient {}: {} intimacy, budget ${:.0}-${:.0}, {} interest tags",
            recipient.id,
            profile.intimacy.label(),
            profile.budget.min,
            profile.budget.max,
            profile.interest_tags.len()
        );

        let filter_settings = FilterSettings {
            luxury_price_ceiling: self.settings.luxury_price_ceiling,
        };
        let filtered = filter_catalog(&catalog, &profile, occasion, &filter_settings);
        info!(
            "filtered catalog: {} of {} products remain",
            filtered.len(),
            catalog.len()
        );

        let content_scores =
            score_products(&filtered, &profile, occasion, mood, &self.content_weights);

        let generative_outcome = self
            .generative
            .recommend(&profile, &recipient.relationship, occasion, mood, &catalog)
            .await;
        if let Some(warning) = generative_outcome.warning {
            warnings.push(warning);
        }

        let recommendations = aggregate(
            &content_scores,
            &generative_outcome.candidates,
            &catalog,
            &profile,
            occasion,
            mood,
            limit,
            &mut warnings,
        );

        info!(
            "run complete: {} recommendations, {} warnings",
            recommendations.len(),
            warnings.len()
        );

        Ok(RecommendationOutcome {
            recommendations,
            warnings,
        })
    }
}

fn validate(request: &RecommendationRequest) -> EngineResult<()> {
    let recipient = &request.recipient;
    if recipient.name.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "recipient name cannot be empty".to_string(),
        ));
    }
    if recipient.relationship.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "relationship label cannot be empty".to_string(),
        ));
    }
    if let Some(range) = &request.budget_override {
        if range.min < 0.0 || range.max < range.min {
            return Err(EngineError::InvalidInput(
                "budget override must satisfy 0 <= min <= max".to_string(),
            ));
        }
    }
    if request.result_limit == Some(0) {
        return Err(EngineError::InvalidInput(
            "result limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
