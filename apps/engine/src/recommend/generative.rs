//! Generative shortlist — wraps the external text-generation call and
//! matches its suggestions back against the real catalog.
//!
//! This path is best-effort by contract: on timeout, transport failure, or
//! malformed output it yields an empty candidate list plus a warning. It
//! never aborts the surrounding run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::{EngineSettings, GenerativeConfig};
use crate::llm_client::LlmClient;
use crate::models::{CandidateScore, Product, ScoreSource};
use crate::profile::RelationshipProfile;
use crate::recommend::prompts::{shortlist_system, SHORTLIST_PROMPT_TEMPLATE};

/// Matched price must be within this fraction of the suggested price.
const PRICE_MATCH_TOLERANCE: f64 = 0.25;

/// One suggestion from the model, validated strictly at the I/O boundary.
/// Missing or mistyped fields fail deserialization as a whole — partially
/// parsed data never flows downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistItem {
    pub name: String,
    pub approximate_price: f64,
    pub category: String,
    pub justification: String,
}

/// Shortlist failure, classified by whether a second attempt could help.
/// Transient covers transport faults, rate limits, and 5xx responses;
/// permanent covers auth failures and schema-level garbage.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    Permanent(String),
}

impl BackendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Transient(_))
    }
}

/// Seam between the recommender and the network. The production
/// implementation wraps [`LlmClient`]; tests script their own.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn shortlist(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<Vec<ShortlistItem>, BackendError>;
}

/// Production backend over the injected LLM client.
pub struct LlmBackend {
    client: LlmClient,
}

impl LlmBackend {
    pub fn new(config: GenerativeConfig) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }
}

#[async_trait]
impl GenerativeBackend for LlmBackend {
    async fn shortlist(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<Vec<ShortlistItem>, BackendError> {
        self.client
            .call_json::<Vec<ShortlistItem>>(prompt, system)
            .await
            .map_err(|e| {
                let message = format!("shortlist call failed: {e}");
                if e.is_transient() {
                    BackendError::Transient(message)
                } else {
                    BackendError::Permanent(message)
                }
            })
    }
}

/// Result of one generative attempt: candidates (possibly empty) plus a
/// warning when the source degraded.
#[derive(Debug, Clone)]
pub struct GenerativeOutcome {
    pub candidates: Vec<CandidateScore>,
    pub warning: Option<String>,
}

impl GenerativeOutcome {
    fn unavailable(reason: &str) -> Self {
        Self {
            candidates: Vec::new(),
            warning: Some(format!(
                "generative recommender unavailable ({reason}), returning content-based results only"
            )),
        }
    }
}

/// Invokes the generative backend with a bounded timeout, at most one retry
/// on transient failure, and a concurrency gate for the provider's rate
/// limit. Suggestions that match no catalog product are dropped per item.
pub struct GenerativeRecommender {
    backend: Arc<dyn GenerativeBackend>,
    gate: Arc<Semaphore>,
    timeout: Duration,
    max_attempts: u32,
    shortlist_size: usize,
    prompt_tag_limit: usize,
}

impl GenerativeRecommender {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: &GenerativeConfig, settings: &EngineSettings) -> Self {
        Self {
            backend,
            gate: Arc::new(Semaphore::new(config.max_concurrency)),
            timeout: config.timeout,
            max_attempts: config.max_attempts.max(1),
            shortlist_size: settings.shortlist_size,
            prompt_tag_limit: settings.prompt_tag_limit,
        }
    }

    /// Returns catalog-matched generative candidates, or an empty list plus
    /// a warning on total failure. Never returns an error.
    pub async fn recommend(
        &self,
        profile: &RelationshipProfile,
        relationship_label: &str,
        occasion: Option<&str>,
        mood: Option<&str>,
        catalog: &[Product],
    ) -> GenerativeOutcome {
        let prompt = self.build_prompt(profile, relationship_label, occasion, mood);
        let system = shortlist_system();

        let mut last_reason = String::from("no attempts made");

        for attempt in 1..=self.max_attempts {
            // A saturated gate is a transient, retryable condition — do not
            // queue behind the provider's rate limit.
            let _permit = match self.gate.try_acquire() {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("generative gate saturated on attempt {attempt}");
                    last_reason = "concurrency limit reached".to_string();
                    continue;
                }
            };

            match tokio::time::timeout(self.timeout, self.backend.shortlist(&prompt, &system)).await
            {
                Ok(Ok(items)) => {
                    let candidates = match_to_catalog(&items, catalog);
                    info!(
                        "generative shortlist: {} suggestions, {} matched to catalog",
                        items.len(),
                        candidates.len()
                    );
                    return GenerativeOutcome {
                        candidates,
                        warning: None,
                    };
                }
                Ok(Err(e)) => {
                    warn!("generative attempt {attempt} failed: {e}");
                    last_reason = e.to_string();
                    // A retry cannot fix a permanent failure (bad key,
                    // unparseable output). Stop burning attempts.
                    if !e.is_transient() {
                        break;
                    }
                }
                Err(_) => {
                    warn!(
                        "generative attempt {attempt} timed out after {:?}",
                        self.timeout
                    );
                    last_reason = format!("timed out after {:?}", self.timeout);
                }
            }
        }

        GenerativeOutcome::unavailable(&last_reason)
    }

    fn build_prompt(
        &self,
        profile: &RelationshipProfile,
        relationship_label: &str,
        occasion: Option<&str>,
        mood: Option<&str>,
    ) -> String {
        let tags: Vec<&str> = profile
            .interest_tags
            .iter()
            .take(self.prompt_tag_limit)
            .map(String::as_str)
            .collect();
        let interests = if tags.is_empty() {
            "unknown".to_string()
        } else {
            tags.join(", ")
        };

        let relationship_summary = format!(
            "A {} ({} relationship, {} formality)",
            relationship_label,
            profile.intimacy.label(),
            profile.formality.label(),
        );

        SHORTLIST_PROMPT_TEMPLATE
            .replace("{count}", &self.shortlist_size.to_string())
            .replace("{relationship_summary}", &relationship_summary)
            .replace("{occasion}", occasion.unwrap_or("none in particular"))
            .replace("{mood}", mood.unwrap_or("any"))
            .replace("{budget_min}", &format!("{:.0}", profile.budget.min))
            .replace("{budget_max}", &format!("{:.0}", profile.budget.max))
            .replace("{interest_tags}", &interests)
    }
}

/// Matches shortlist items against the catalog and converts matches into
/// position-scored candidates (first item scores highest). Unmatched items
/// are silently dropped — the engine never recommends a product that does
/// not exist in the caller's catalog.
pub fn match_to_catalog(items: &[ShortlistItem], catalog: &[Product]) -> Vec<CandidateScore> {
    let total = items.len();
    let mut candidates: Vec<CandidateScore> = Vec::new();

    for (position, item) in items.iter().enumerate() {
        let Some(product) = find_match(item, catalog) else {
            continue;
        };

        let raw_score = (total - position) as f64;

        // Two suggestions can resolve to one product; keep the better rank.
        if let Some(existing) = candidates
            .iter_mut()
            .find(|c| c.product_id == product.id)
        {
            if raw_score > existing.raw_score {
                existing.raw_score = raw_score;
                existing.justification = Some(item.justification.clone());
            }
            continue;
        }

        candidates.push(CandidateScore {
            product_id: product.id,
            raw_score,
            source: ScoreSource::Generative,
            justification: Some(item.justification.clone()),
        });
    }

    candidates
}

/// Nearest-match lookup: exact normalized name, then name containment in
/// either direction, then same category with price within tolerance
/// (closest price wins).
fn find_match<'a>(item: &ShortlistItem, catalog: &'a [Product]) -> Option<&'a Product> {
    let wanted = normalize(&item.name);

    // A blank name would contain-match every product below; drop it.
    if wanted.is_empty() {
        return None;
    }

    if let Some(exact) = catalog.iter().find(|p| normalize(&p.name) == wanted) {
        return Some(exact);
    }

    if let Some(partial) = catalog.iter().find(|p| {
        let have = normalize(&p.name);
        have.contains(&wanted) || wanted.contains(&have)
    }) {
        return Some(partial);
    }

    let tolerance = item.approximate_price.abs() * PRICE_MATCH_TOLERANCE;
    catalog
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(&item.category))
        .filter(|p| (p.price - item.approximate_price).abs() <= tolerance)
        .min_by(|a, b| {
            let da = (a.price - item.approximate_price).abs();
            let db = (b.price - item.approximate_price).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
