use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog item. Immutable within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Non-negative price in the caller's currency.
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Occasions this product suits, e.g. "birthday". Empty = any occasion.
    #[serde(default)]
    pub occasions: Vec<String>,
    /// Moods this product suits, e.g. "sentimental". Empty = any mood.
    #[serde(default)]
    pub moods: Vec<String>,
}

/// Capability: return the current product catalog.
///
/// The scoring core never knows whether products came from a database or a
/// fixture — the service layer picks the implementation.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn catalog(&self) -> anyhow::Result<Vec<Product>>;
}

/// In-memory catalog. Production fallback for demos and the test fixture
/// source for the whole crate.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn catalog(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.products.clone())
    }
}
