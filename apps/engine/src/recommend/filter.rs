//! Catalog filtering — narrows the catalog to items plausible for a
//! profile and occasion. Deterministic, no I/O.

use crate::models::Product;
use crate::profile::{FormalityLevel, RelationshipProfile};

/// Categories excluded for formal profiles.
const NOVELTY_CATEGORIES: &[&str] = &["novelty", "gag_gift", "gag-gift"];

/// Category excluded for casual profiles above the configured ceiling.
const LUXURY_CATEGORY: &str = "luxury";

#[derive(Debug, Clone)]
pub struct FilterSettings {
    /// Casual profiles exclude luxury items priced above this.
    pub luxury_price_ceiling: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            luxury_price_ceiling: 150.0,
        }
    }
}

/// Returns the in-budget products that either share an interest tag with the
/// profile or carry a category allowed for the profile's formality level.
///
/// If that yields nothing but the catalog has in-budget items, falls back to
/// budget-only filtering — a run must not trivially produce zero candidates
/// when the catalog is non-empty within budget.
pub fn filter_catalog(
    catalog: &[Product],
    profile: &RelationshipProfile,
    occasion: Option<&str>,
    settings: &FilterSettings,
) -> Vec<Product> {
    let in_budget: Vec<&Product> = catalog
        .iter()
        .filter(|p| profile.budget.contains(p.price))
        .collect();

    let filtered: Vec<Product> = in_budget
        .iter()
        .filter(|p| suits_occasion(p, occasion))
        .filter(|p| shares_interest_tag(p, profile) || category_allowed(p, profile, settings))
        .map(|p| (*p).clone())
        .collect();

    if filtered.is_empty() {
        return in_budget.into_iter().cloned().collect();
    }

    filtered
}

fn shares_interest_tag(product: &Product, profile: &RelationshipProfile) -> bool {
    product
        .tags
        .iter()
        .any(|tag| profile.interest_tags.contains(&tag.to_lowercase()))
}

/// A product with declared occasion affinities must list the target
/// occasion; products with no declared occasions suit any occasion.
fn suits_occasion(product: &Product, occasion: Option<&str>) -> bool {
    match occasion {
        Some(target) if !product.occasions.is_empty() => product
            .occasions
            .iter()
            .any(|o| o.eq_ignore_ascii_case(target)),
        _ => true,
    }
}

fn category_allowed(
    product: &Product,
    profile: &RelationshipProfile,
    settings: &FilterSettings,
) -> bool {
    let category = product.category.to_lowercase();
    match profile.formality {
        FormalityLevel::Formal => !NOVELTY_CATEGORIES.contains(&category.as_str()),
        FormalityLevel::Casual => {
            !(category == LUXURY_CATEGORY && product.price > settings.luxury_price_ceiling)
        }
        FormalityLevel::Neutral => true,
    }
}
