//! Content-based similarity over macronutrient vectors.
//!
//! Similarity between a candidate and a query is the cosine of the angle
//! between their macronutrient vectors, restricted to the query's present
//! dimensions, remapped linearly from the angle so that parallel vectors
//! score 1, orthogonal vectors 0, and opposite vectors -1:
//!
//! ```text
//! similarity = 1 - 2·acos(cosθ)/π
//! ```
//!
//! Candidates whose restricted vector (or the query itself) is all-zero are
//! skipped rather than scored: cosine similarity is undefined at the zero
//! vector.

use crate::food::{FoodItem, MacroQuery};
use std::f32::consts::PI;

/// Scores a single candidate against the query, restricted to the query's
/// present dimensions. Returns `None` when the score is undefined.
fn score(item: &FoodItem, query: &MacroQuery) -> Option<f32> {
    let mut numerator = 0.0;
    let mut item_sq = 0.0;
    let mut query_sq = 0.0;
    for (q, c) in query.paired_with(item) {
        numerator += c * q;
        item_sq += c * c;
        query_sq += q * q;
    }

    let denominator = item_sq.sqrt() * query_sq.sqrt();
    if denominator == 0.0 {
        return None;
    }

    // Floating-point drift can push the ratio slightly outside [-1, 1]
    let angle = (numerator / denominator).clamp(-1.0, 1.0).acos();
    Some(1.0 - 2.0 * angle / PI)
}

/// Ranks candidates by similarity to a macronutrient query, best first.
///
/// Unscoreable candidates (zero restricted vector, or an effectively empty
/// query) are omitted. Ties keep input order.
///
/// # Examples
///
/// ```
/// use nutrir::food::{FoodItem, MacroQuery};
/// use nutrir::recommend::similarity::rank_by_similarity;
///
/// let candidates = vec![
///     FoodItem::new(0, "lentils", 9.0, 20.0, 0.4, None),
///     FoodItem::new(1, "butter", 0.9, 0.1, 81.0, None),
/// ];
/// let query = MacroQuery::new().with_protein(8.0).with_carb(22.0);
///
/// let ranked = rank_by_similarity(&candidates, &query);
/// assert_eq!(ranked[0].1.id, 0);
/// ```
#[must_use]
pub fn rank_by_similarity<'a>(
    candidates: &'a [FoodItem],
    query: &MacroQuery,
) -> Vec<(f32, &'a FoodItem)> {
    let mut ranked: Vec<(f32, &FoodItem)> = candidates
        .iter()
        .filter_map(|item| score(item, query).map(|s| (s, item)))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
}

/// Ranks replacements for a reference item, best first.
///
/// The reference item is removed from the candidate set before scoring, and
/// the comparison uses its protein, carb and fat values (not calories).
#[must_use]
pub fn rank_replacements<'a>(
    candidates: &'a [FoodItem],
    reference: &FoodItem,
) -> Vec<(f32, &'a FoodItem)> {
    let query = MacroQuery::from_item(reference);
    let mut ranked: Vec<(f32, &FoodItem)> = candidates
        .iter()
        .filter(|item| item.id != reference.id)
        .filter_map(|item| score(item, &query).map(|s| (s, item)))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
}

#[cfg(test)]
#[path = "similarity_proptests.rs"]
mod similarity_proptests;

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: usize, protein: f32, carb: f32, fat: f32) -> FoodItem {
        FoodItem::new(id, format!("item-{id}"), protein, carb, fat, None)
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let candidates = vec![item(1, 20.0, 10.0, 5.0)];
        let query = MacroQuery::new()
            .with_protein(20.0)
            .with_carb(10.0)
            .with_fat(5.0);
        let ranked = rank_by_similarity(&candidates, &query);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].0 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        // Protein-only reference vs. carb-only candidate: numerator 0,
        // angle pi/2, similarity exactly 0
        let candidates = vec![
            item(1, 20.0, 0.0, 5.0),
            item(2, 0.0, 30.0, 0.0),
        ];
        let reference = item(1, 20.0, 0.0, 5.0);
        let ranked = rank_replacements(&candidates, &reference);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].1.id, 2);
        assert!(ranked[0].0.abs() < 1e-6);
    }

    #[test]
    fn test_self_is_excluded() {
        let candidates = vec![item(1, 10.0, 10.0, 10.0), item(2, 10.0, 10.0, 10.0)];
        let ranked = rank_replacements(&candidates, &candidates[0]);
        assert!(ranked.iter().all(|(_, i)| i.id != 1));
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let candidates = vec![
            item(1, 5.0, 20.0, 2.0),
            item(2, 18.0, 3.0, 9.0),
            item(3, 12.0, 12.0, 4.0),
        ];
        let query = MacroQuery::new().with_protein(15.0).with_carb(5.0);
        let first = rank_by_similarity(&candidates, &query);
        let second = rank_by_similarity(&candidates, &query);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.0, b.0);
            assert_eq!(a.1.id, b.1.id);
        }
    }

    #[test]
    fn test_absent_dimensions_ignored() {
        // Same protein/carb, wildly different fat and calories: identical
        // scores under a protein+carb query
        let candidates = vec![item(1, 10.0, 20.0, 1.0), item(2, 10.0, 20.0, 50.0)];
        let query = MacroQuery::new().with_protein(12.0).with_carb(18.0);
        let ranked = rank_by_similarity(&candidates, &query);
        assert_eq!(ranked.len(), 2);
        assert!((ranked[0].0 - ranked[1].0).abs() < 1e-6);
        // Stable sort keeps input order on ties
        assert_eq!(ranked[0].1.id, 1);
        assert_eq!(ranked[1].1.id, 2);
    }

    #[test]
    fn test_scores_bounded_and_descending() {
        let candidates = vec![
            item(1, 30.0, 1.0, 2.0),
            item(2, 1.0, 30.0, 1.0),
            item(3, 15.0, 15.0, 15.0),
            item(4, 2.0, 2.0, 30.0),
        ];
        let query = MacroQuery::new()
            .with_protein(25.0)
            .with_carb(5.0)
            .with_fat(5.0);
        let ranked = rank_by_similarity(&candidates, &query);
        for window in ranked.windows(2) {
            assert!(window[0].0 >= window[1].0);
        }
        for (s, _) in &ranked {
            assert!((-1.0..=1.0).contains(s));
        }
    }

    #[test]
    fn test_zero_candidate_skipped() {
        let candidates = vec![item(1, 0.0, 0.0, 0.0), item(2, 10.0, 5.0, 1.0)];
        let query = MacroQuery::new().with_protein(10.0).with_carb(5.0);
        let ranked = rank_by_similarity(&candidates, &query);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].1.id, 2);
        assert!(!ranked[0].0.is_nan());
    }

    #[test]
    fn test_empty_candidates() {
        let query = MacroQuery::new().with_protein(10.0);
        assert!(rank_by_similarity(&[], &query).is_empty());
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let candidates = vec![item(1, 10.0, 5.0, 1.0)];
        assert!(rank_by_similarity(&candidates, &MacroQuery::new()).is_empty());
    }

    #[test]
    fn test_zero_dimension_still_weights_candidate_norm() {
        // A present-and-zero query dimension contributes the candidate's
        // component to the candidate norm, so a candidate heavy in that
        // dimension scores lower than one matching the zero
        let candidates = vec![item(1, 20.0, 0.0, 0.0), item(2, 20.0, 40.0, 0.0)];
        let query = MacroQuery::new().with_protein(20.0).with_carb(0.0);
        let ranked = rank_by_similarity(&candidates, &query);
        assert_eq!(ranked[0].1.id, 1);
        assert!(ranked[0].0 > ranked[1].0);
    }

    #[test]
    fn test_replacement_ranking_prefers_closer_profile() {
        let catalog = vec![
            item(0, 31.0, 0.0, 3.6),  // chicken
            item(1, 29.0, 0.0, 7.0),  // turkey
            item(2, 5.0, 25.0, 1.1),  // pasta
        ];
        let ranked = rank_replacements(&catalog, &catalog[0]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].1.id, 1);
        assert_eq!(ranked[1].1.id, 2);
    }
}
