//! Hybrid aggregation — merges content and generative candidates into one
//! ranked, deduplicated, size-bounded recommendation list.
//!
//! One canonical scoring rule lives here: min-max normalization per source,
//! then `max + 0.1 * min` for products present in both sources. The combined
//! value is both the recommendation score and its confidence.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    CandidateScore, Product, Provenance, Recommendation, RecommendationStatus,
};
use crate::profile::RelationshipProfile;

/// Agreement bonus weight applied to the weaker source's normalized score
/// when a product appears in both lists.
const AGREEMENT_WEIGHT: f64 = 0.1;

/// Aggregates both candidate lists into the final ranked output.
///
/// Ranking runs on the unclamped combined score (so the agreement bonus is
/// order-significant); the stored score is clamped to [0, 1]. If the merged
/// list comes out empty despite a non-empty catalog, falls back to the
/// top-N price-fit products from the unfiltered catalog and flags it.
pub fn aggregate(
    content: &[CandidateScore],
    generative: &[CandidateScore],
    catalog: &[Product],
    profile: &RelationshipProfile,
    occasion: Option<&str>,
    mood: Option<&str>,
    limit: usize,
    warnings: &mut Vec<String>,
) -> Vec<Recommendation> {
    let by_id: HashMap<Uuid, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

    let content_norm = normalize(content);
    let generative_norm = normalize(generative);

    let justifications: HashMap<Uuid, &str> = generative
        .iter()
        .filter_map(|c| c.justification.as_deref().map(|j| (c.product_id, j)))
        .collect();

    let mut merged: Vec<(Uuid, f64, Provenance)> = Vec::new();
    let mut seen: HashMap<Uuid, usize> = HashMap::new();

    for (id, score) in content_norm {
        seen.insert(id, merged.len());
        merged.push((id, score, Provenance::Content));
    }
    for (id, gen_score) in generative_norm {
        match seen.get(&id) {
            Some(&index) => {
                let (_, content_score, _) = merged[index];
                let combined = gen_score.max(content_score)
                    + AGREEMENT_WEIGHT * gen_score.min(content_score);
                merged[index] = (id, combined, Provenance::Both);
            }
            None => merged.push((id, gen_score, Provenance::Generative)),
        }
    }

    // Descending by combined score, ties broken by product id ascending.
    merged.sort_by(|(a_id, a, _), (b_id, b, _)| {
        b.partial_cmp(a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a_id.cmp(b_id))
    });
    merged.truncate(limit);

    let mut recommendations: Vec<Recommendation> = merged
        .into_iter()
        .filter_map(|(id, score, sources)| {
            let product = by_id.get(&id)?;
            let reasoning = match justifications.get(&id) {
                Some(text) => (*text).to_string(),
                None => synthesize_reasoning(product, profile),
            };
            Some(build_recommendation(
                product,
                score.clamp(0.0, 1.0),
                reasoning,
                sources,
                occasion,
                mood,
            ))
        })
        .collect();

    if recommendations.is_empty() && !catalog.is_empty() {
        warnings.push(
            "no candidates survived aggregation; falling back to closest price fits".to_string(),
        );
        recommendations = price_fit_fallback(catalog, profile, occasion, mood, limit);
    }

    recommendations
}

/// Min-max scales one source's raw scores onto [0, 1], preserving input
/// order. A single candidate or zero variance collapses to 1.0.
fn normalize(candidates: &[CandidateScore]) -> Vec<(Uuid, f64)> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let min = candidates
        .iter()
        .map(|c| c.raw_score)
        .fold(f64::INFINITY, f64::min);
    let max = candidates
        .iter()
        .map(|c| c.raw_score)
        .fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    candidates
        .iter()
        .map(|c| {
            let scaled = if spread > 0.0 {
                (c.raw_score - min) / spread
            } else {
                1.0
            };
            (c.product_id, scaled)
        })
        .collect()
}

/// Deterministic reasoning for candidates without a generative
/// justification, built from the profile and matched interest tags.
fn synthesize_reasoning(product: &Product, profile: &RelationshipProfile) -> String {
    let matched: Vec<&str> = product
        .tags
        .iter()
        .filter(|tag| profile.interest_tags.contains(&tag.to_lowercase()))
        .map(String::as_str)
        .collect();

    match matched.first() {
        Some(tag) => format!(
            "Matches the recipient's interest in {} within a {} gift budget",
            tag,
            profile.formality.label()
        ),
        None => format!(
            "Fits the ${:.0}-${:.0} budget for a {} relationship",
            profile.budget.min,
            profile.budget.max,
            profile.intimacy.label()
        ),
    }
}

/// Degenerate-output guard: the top-N products by price fit against the
/// suggested budget midpoint, drawn from the unfiltered catalog.
fn price_fit_fallback(
    catalog: &[Product],
    profile: &RelationshipProfile,
    occasion: Option<&str>,
    mood: Option<&str>,
    limit: usize,
) -> Vec<Recommendation> {
    let midpoint = profile.budget.midpoint();
    let mut by_fit: Vec<&Product> = catalog.iter().collect();
    by_fit.sort_by(|a, b| {
        let da = (a.price - midpoint).abs();
        let db = (b.price - midpoint).abs();
        da.partial_cmp(&db)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });

    by_fit
        .into_iter()
        .take(limit)
        .map(|product| {
            let spread = (profile.budget.max - profile.budget.min).max(f64::EPSILON);
            let fit = (1.0 - (product.price - midpoint).abs() / spread).clamp(0.0, 1.0);
            build_recommendation(
                product,
                fit,
                format!(
                    "Closest price fit to the suggested ${:.0}-${:.0} budget",
                    profile.budget.min, profile.budget.max
                ),
                Provenance::Content,
                occasion,
                mood,
            )
        })
        .collect()
}

fn build_recommendation(
    product: &Product,
    score: f64,
    reasoning: String,
    sources: Provenance,
    occasion: Option<&str>,
    mood: Option<&str>,
) -> Recommendation {
    Recommendation {
        product_id: product.id,
        product_name: product.name.clone(),
        price: product.price,
        score,
        reasoning,
        sources,
        occasion: occasion.map(str::to_string),
        mood: mood.map(str::to_string),
        status: RecommendationStatus::Pending,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreSource;
    use crate::profile::{
        BudgetRange, EmotionalConnection, FormalityLevel, IntimacyLevel, RelationshipProfile,
    };
    use std::collections::BTreeSet;

    fn make_profile() -> RelationshipProfile {
        RelationshipProfile {
            intimacy: IntimacyLevel::Close,
            formality: FormalityLevel::Casual,
            emotional_connection: EmotionalConnection::High,
            budget: BudgetRange {
                min: 30.0,
                max: 150.0,
            },
            interest_tags: BTreeSet::from(["wellness".to_string()]),
        }
    }

    fn make_product(id: Uuid, name: &str, price: f64, tags: &[&str]) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            category: "home".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            occasions: vec![],
            moods: vec![],
        }
    }

    fn content_score(id: Uuid, raw: f64) -> CandidateScore {
        CandidateScore {
            product_id: id,
            raw_score: raw,
            source: ScoreSource::Content,
            justification: None,
        }
    }

    fn generative_score(id: Uuid, raw: f64, justification: &str) -> CandidateScore {
        CandidateScore {
            product_id: id,
            raw_score: raw,
            source: ScoreSource::Generative,
            justification: Some(justification.to_string()),
        }
    }

    #[test]
    fn test_normalize_min_max_scaling() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let scaled = normalize(&[
            content_score(a, 2.0),
            content_score(b, 6.0),
            content_score(c, 4.0),
        ]);
        assert_eq!(scaled[0], (a, 0.0));
        assert_eq!(scaled[1], (b, 1.0));
        assert_eq!(scaled[2], (c, 0.5));
    }

    #[test]
    fn test_normalize_zero_variance_collapses_to_one() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let scaled = normalize(&[content_score(a, 3.0), content_score(b, 3.0)]);
        assert!(scaled.iter().all(|(_, s)| *s == 1.0));

        let single = normalize(&[content_score(a, 7.5)]);
        assert_eq!(single, vec![(a, 1.0)]);
    }

    #[test]
    fn test_agreement_bonus_combination() {
        // Normalized content 0.6, generative 0.8 → 0.8 + 0.1*0.6 = 0.86,
        // strictly greater than either individual score.
        let shared = Uuid::from_u128(10);
        let content_only_a = Uuid::from_u128(11);
        let content_only_b = Uuid::from_u128(12);
        let gen_only_a = Uuid::from_u128(13);
        let gen_only_b = Uuid::from_u128(14);

        // Content raws 0/6/10 → shared at 6 normalizes to 0.6
        let content = vec![
            content_score(content_only_a, 0.0),
            content_score(shared, 6.0),
            content_score(content_only_b, 10.0),
        ];
        // Generative raws 0/8/10 → shared at 8 normalizes to 0.8
        let generative = vec![
            generative_score(gen_only_a, 0.0, "first"),
            generative_score(shared, 8.0, "both like it"),
            generative_score(gen_only_b, 10.0, "last"),
        ];

        let catalog: Vec<Product> = [shared, content_only_a, content_only_b, gen_only_a, gen_only_b]
            .iter()
            .map(|id| make_product(*id, "Item", 90.0, &[]))
            .collect();

        let mut warnings = Vec::new();
        let recs = aggregate(
            &content,
            &generative,
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );

        let rec = recs.iter().find(|r| r.product_id == shared).unwrap();
        assert!((rec.score - 0.86).abs() < 1e-9, "got {}", rec.score);
        assert!(rec.score > 0.8 && rec.score > 0.6);
        assert_eq!(rec.sources, Provenance::Both);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_no_duplicate_product_ids_in_output() {
        let id = Uuid::from_u128(1);
        let catalog = vec![make_product(id, "Candle", 50.0, &[])];
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[content_score(id, 1.0)],
            &[generative_score(id, 5.0, "lovely")],
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].sources, Provenance::Both);
    }

    #[test]
    fn test_output_bounded_by_limit_and_candidates() {
        let ids: Vec<Uuid> = (0..8).map(Uuid::from_u128).collect();
        let catalog: Vec<Product> = ids
            .iter()
            .map(|id| make_product(*id, "Item", 90.0, &[]))
            .collect();
        let content: Vec<CandidateScore> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| content_score(*id, i as f64))
            .collect();

        let mut warnings = Vec::new();
        let capped = aggregate(
            &content,
            &[],
            &catalog,
            &make_profile(),
            None,
            None,
            3,
            &mut warnings,
        );
        assert_eq!(capped.len(), 3);

        let all = aggregate(
            &content,
            &[],
            &catalog,
            &make_profile(),
            None,
            None,
            50,
            &mut warnings,
        );
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn test_sorted_descending_with_id_tie_break() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let catalog = vec![
            make_product(a, "A", 90.0, &[]),
            make_product(b, "B", 90.0, &[]),
        ];
        let mut warnings = Vec::new();
        // Equal raw scores → both normalize to 1.0 → tie broken by id.
        let recs = aggregate(
            &[content_score(b, 4.0), content_score(a, 4.0)],
            &[],
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        assert_eq!(recs[0].product_id, a);
        assert_eq!(recs[1].product_id, b);
    }

    #[test]
    fn test_generative_justification_used_verbatim() {
        let id = Uuid::from_u128(1);
        let catalog = vec![make_product(id, "Teapot", 60.0, &[])];
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[],
            &[generative_score(id, 1.0, "A daily ritual upgrade for tea lovers")],
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        assert_eq!(recs[0].reasoning, "A daily ritual upgrade for tea lovers");
        assert_eq!(recs[0].sources, Provenance::Generative);
    }

    #[test]
    fn test_synthesized_reasoning_names_matched_tag() {
        let id = Uuid::from_u128(1);
        let catalog = vec![make_product(id, "Yoga mat", 60.0, &["wellness"])];
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[content_score(id, 1.0)],
            &[],
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        assert!(recs[0].reasoning.contains("wellness"));
        assert!(recs[0].reasoning.contains("casual"));
    }

    #[test]
    fn test_degenerate_guard_falls_back_to_price_fit() {
        let near = Uuid::from_u128(1);
        let far = Uuid::from_u128(2);
        let catalog = vec![
            make_product(near, "Near midpoint", 85.0, &[]),
            make_product(far, "Far from midpoint", 500.0, &[]),
        ];
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[],
            &[],
            &catalog,
            &make_profile(),
            None,
            None,
            1,
            &mut warnings,
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].product_id, near);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("falling back"));
    }

    #[test]
    fn test_empty_catalog_stays_empty_without_warning_here() {
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[],
            &[],
            &[],
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        assert!(recs.is_empty());
        // The empty-catalog warning belongs to the engine, not the aggregator.
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_scores_clamped_to_unit_interval() {
        // Both sources agree at their maxima: 1.0 + 0.1*1.0 = 1.1 → stored 1.0.
        let id = Uuid::from_u128(1);
        let other = Uuid::from_u128(2);
        let catalog = vec![
            make_product(id, "A", 90.0, &[]),
            make_product(other, "B", 90.0, &[]),
        ];
        let mut warnings = Vec::new();
        let recs = aggregate(
            &[content_score(id, 10.0), content_score(other, 1.0)],
            &[generative_score(id, 5.0, "top pick"), generative_score(other, 1.0, "ok")],
            &catalog,
            &make_profile(),
            None,
            None,
            12,
            &mut warnings,
        );
        let top = recs.iter().find(|r| r.product_id == id).unwrap();
        assert_eq!(top.score, 1.0);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    }
}
