use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Configuration for the generative shortlist backend.
///
/// API key, base URL, and model are injected here — never hardcoded at the
/// call site — so tests and alternate providers can swap them freely.
#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Hard timeout for one shortlist call.
    pub timeout: Duration,
    /// Total shortlist attempts per run: 1 initial call + (max_attempts - 1)
    /// retries. The recommender is the only retry owner — the transport
    /// client never loops.
    pub max_attempts: u32,
    /// Concurrent in-flight calls allowed against the provider.
    pub max_concurrency: usize,
}

impl GenerativeConfig {
    /// Loads configuration from environment variables (reading `.env` if
    /// present). Only `GENERATIVE_API_KEY` is required.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(GenerativeConfig {
            api_key: require_env("GENERATIVE_API_KEY")?,
            base_url: std::env::var("GENERATIVE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GENERATIVE_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: 2048,
            timeout: Duration::from_secs(
                std::env::var("GENERATIVE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse::<u64>()
                    .context("GENERATIVE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_attempts: 2,
            max_concurrency: 4,
        })
    }

    /// Config for tests and offline use — points at a placeholder endpoint.
    pub fn for_tests() -> Self {
        GenerativeConfig {
            api_key: "test-key".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            timeout: Duration::from_secs(10),
            max_attempts: 2,
            max_concurrency: 4,
        }
    }
}

/// Engine-level tunables with sensible defaults. All injectable; no globals.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Maximum recommendations returned per run.
    pub result_limit: usize,
    /// Casual profiles exclude luxury-category items priced above this.
    pub luxury_price_ceiling: f64,
    /// How many shortlist items to request from the generative backend.
    pub shortlist_size: usize,
    /// At most this many interest tags are included in the prompt.
    pub prompt_tag_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            result_limit: 12,
            luxury_price_ceiling: 150.0,
            shortlist_size: 8,
            prompt_tag_limit: 6,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
