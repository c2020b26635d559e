//! Content-based scoring — attribute overlap between profile and product
//! metadata. No external model involved. Pure and deterministic.

use serde::{Deserialize, Serialize};

use crate::models::{CandidateScore, Product, ScoreSource};
use crate::profile::RelationshipProfile;

/// Weights for the three content-score terms. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentWeights {
    pub tag_overlap: f64,
    pub price_fit: f64,
    pub occasion_affinity: f64,
}

impl Default for ContentWeights {
    fn default() -> Self {
        Self {
            tag_overlap: 0.5,
            price_fit: 0.3,
            occasion_affinity: 0.2,
        }
    }
}

/// Scores every filtered product against the profile.
///
/// Per product: `0.5 * tag_overlap_count + 0.3 * price_fit + 0.2 * bonus`.
/// Raw scores are NOT normalized here — the aggregator scales both sources
/// onto one [0,1] scale once generative scores are known. Output is sorted
/// descending, ties broken by product id ascending for reproducibility.
pub fn score_products(
    products: &[Product],
    profile: &RelationshipProfile,
    occasion: Option<&str>,
    mood: Option<&str>,
    weights: &ContentWeights,
) -> Vec<CandidateScore> {
    let mut scores: Vec<(CandidateScore, uuid::Uuid)> = products
        .iter()
        .map(|product| {
            let overlap = tag_overlap_count(product, profile) as f64;
            let price_fit = price_fit(product.price, profile);
            let bonus = affinity_bonus(product, occasion, mood);

            let raw = weights.tag_overlap * overlap
                + weights.price_fit * price_fit
                + weights.occasion_affinity * bonus;

            (
                CandidateScore {
                    product_id: product.id,
                    raw_score: raw,
                    source: ScoreSource::Content,
                    justification: None,
                },
                product.id,
            )
        })
        .collect();

    scores.sort_by(|(a, a_id), (b, b_id)| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a_id.cmp(b_id))
    });

    scores.into_iter().map(|(score, _)| score).collect()
}

fn tag_overlap_count(product: &Product, profile: &RelationshipProfile) -> usize {
    product
        .tags
        .iter()
        .filter(|tag| profile.interest_tags.contains(&tag.to_lowercase()))
        .count()
}

/// Inverse normalized distance of price from the budget midpoint: 1.0 at
/// the midpoint, 0.0 at (or beyond) the range edges. A degenerate range
/// (min == max) scores 1.0 only at the single admissible price.
fn price_fit(price: f64, profile: &RelationshipProfile) -> f64 {
    let midpoint = profile.budget.midpoint();
    let half_width = (profile.budget.max - profile.budget.min) / 2.0;
    if half_width <= 0.0 {
        return if (price - midpoint).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        };
    }
    (1.0 - (price - midpoint).abs() / half_width).clamp(0.0, 1.0)
}

/// Small positive bonus when the category matches an occasion preference or
/// the product's mood affinities include the run's mood. Capped at 1.0 so
/// the weighted term never exceeds its 0.2 share.
fn affinity_bonus(product: &Product, occasion: Option<&str>, mood: Option<&str>) -> f64 {
    let mut bonus: f64 = 0.0;

    if let Some(occasion) = occasion {
        let preferred = occasion_preferred_categories(occasion);
        if preferred
            .iter()
            .any(|c| product.category.eq_ignore_ascii_case(c))
        {
            bonus += 1.0;
        }
    }

    if let Some(mood) = mood {
        if product.moods.iter().any(|m| m.eq_ignore_ascii_case(mood)) {
            bonus += 0.5;
        }
    }

    bonus.min(1.0)
}

/// Occasion-specific category preference table.
fn occasion_preferred_categories(occasion: &str) -> &'static [&'static str] {
    match occasion.to_lowercase().as_str() {
        "birthday" => &["books", "gaming", "tech", "fashion", "experience"],
        "anniversary" => &["fashion", "luxury", "food_beverage", "experience"],
        "valentines" | "valentine's day" => &["fashion", "luxury", "food_beverage"],
        "christmas" | "holiday" => &["books", "kitchen", "gaming", "home", "tech"],
        "wedding" => &["home", "kitchen", "luxury"],
        "graduation" => &["books", "tech", "stationery"],
        "housewarming" => &["home", "kitchen", "gardening"],
        "retirement" => &["books", "travel", "gardening", "experience"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        BudgetRange, EmotionalConnection, FormalityLevel, IntimacyLevel, RelationshipProfile,
    };
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn make_profile(tags: &[&str]) -> RelationshipProfile {
        RelationshipProfile {
            intimacy: IntimacyLevel::Close,
            formality: FormalityLevel::Casual,
            emotional_connection: EmotionalConnection::High,
            budget: BudgetRange {
                min: 30.0,
                max: 150.0,
            },
            interest_tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn make_product(id: Uuid, name: &str, price: f64, category: &str, tags: &[&str]) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            occasions: vec![],
            moods: vec![],
        }
    }

    #[test]
    fn test_price_fit_peaks_at_midpoint() {
        let profile = make_profile(&[]);
        // Midpoint of 30–150 is 90
        assert!((price_fit(90.0, &profile) - 1.0).abs() < f64::EPSILON);
        assert!((price_fit(30.0, &profile) - 0.0).abs() < f64::EPSILON);
        assert!((price_fit(150.0, &profile) - 0.0).abs() < f64::EPSILON);
        assert!(price_fit(60.0, &profile) > price_fit(40.0, &profile));
    }

    #[test]
    fn test_tag_overlap_dominates_score() {
        let profile = make_profile(&["wellness", "food_beverage"]);
        let matched = Uuid::new_v4();
        let unmatched = Uuid::new_v4();
        let products = vec![
            make_product(matched, "Yoga mat", 90.0, "wellness", &["wellness"]),
            make_product(unmatched, "Desk lamp", 90.0, "home", &[]),
        ];
        let scores = score_products(&products, &profile, None, None, &ContentWeights::default());
        assert_eq!(scores[0].product_id, matched);
        assert!(scores[0].raw_score > scores[1].raw_score);
    }

    #[test]
    fn test_occasion_bonus_applied() {
        let profile = make_profile(&[]);
        let book = Uuid::new_v4();
        let candle = Uuid::new_v4();
        let products = vec![
            make_product(book, "Novel", 90.0, "books", &[]),
            make_product(candle, "Candle", 90.0, "home", &[]),
        ];
        let scores = score_products(
            &products,
            &profile,
            Some("birthday"),
            None,
            &ContentWeights::default(),
        );
        assert_eq!(scores[0].product_id, book);
        let diff = scores[0].raw_score - scores[1].raw_score;
        assert!((diff - 0.2).abs() < 1e-9, "bonus term should add 0.2, got {diff}");
    }

    #[test]
    fn test_mood_affinity_earns_bonus() {
        let profile = make_profile(&[]);
        let mut cozy = make_product(Uuid::new_v4(), "Throw blanket", 90.0, "home", &[]);
        cozy.moods = vec!["cozy".to_string()];
        let plain = make_product(Uuid::new_v4(), "Desk fan", 90.0, "home", &[]);
        let cozy_id = cozy.id;

        let scores = score_products(
            &[cozy, plain],
            &profile,
            None,
            Some("cozy"),
            &ContentWeights::default(),
        );
        assert_eq!(scores[0].product_id, cozy_id);
    }

    #[test]
    fn test_bonus_term_capped_at_weight() {
        // Occasion + mood together must not exceed the 0.2 share.
        let profile = make_profile(&[]);
        let mut product = make_product(Uuid::new_v4(), "Novel", 90.0, "books", &[]);
        product.moods = vec!["fun".to_string()];
        let scores = score_products(
            &[product],
            &profile,
            Some("birthday"),
            Some("fun"),
            &ContentWeights::default(),
        );
        // price_fit = 1.0 → 0.3; bonus capped at 1.0 → 0.2; no tags → 0.0
        assert!((scores[0].raw_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_tie_break_by_id_ascending() {
        let profile = make_profile(&[]);
        let id_a = Uuid::from_u128(1);
        let id_b = Uuid::from_u128(2);
        // Same price, category, tags → identical scores
        let products = vec![
            make_product(id_b, "B", 90.0, "home", &[]),
            make_product(id_a, "A", 90.0, "home", &[]),
        ];
        let scores = score_products(&products, &profile, None, None, &ContentWeights::default());
        assert_eq!(scores[0].product_id, id_a);
        assert_eq!(scores[1].product_id, id_b);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let profile = make_profile(&["books"]);
        let products: Vec<Product> = (0..5)
            .map(|i| {
                make_product(
                    Uuid::from_u128(i),
                    "Item",
                    40.0 + i as f64 * 20.0,
                    "books",
                    &["books"],
                )
            })
            .collect();
        let a = score_products(&products, &profile, Some("birthday"), None, &ContentWeights::default());
        let b = score_products(&products, &profile, Some("birthday"), None, &ContentWeights::default());
        let ids_a: Vec<_> = a.iter().map(|s| s.product_id).collect();
        let ids_b: Vec<_> = b.iter().map(|s| s.product_id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_all_scores_tagged_content() {
        let profile = make_profile(&[]);
        let products = vec![make_product(Uuid::new_v4(), "Mug", 50.0, "kitchen", &[])];
        let scores = score_products(&products, &profile, None, None, &ContentWeights::default());
        assert!(scores.iter().all(|s| s.source == ScoreSource::Content));
    }
}
