use super::*;
use proptest::prelude::*;

fn arb_item(id: usize) -> impl Strategy<Value = FoodItem> {
    (0.0_f32..200.0, 0.0_f32..200.0, 0.0_f32..200.0)
        .prop_map(move |(p, c, f)| FoodItem::new(id, format!("item-{id}"), p, c, f, None))
}

fn arb_catalog() -> impl Strategy<Value = Vec<FoodItem>> {
    prop::collection::vec((0.0_f32..200.0, 0.0_f32..200.0, 0.0_f32..200.0), 1..20).prop_map(
        |macros| {
            macros
                .into_iter()
                .enumerate()
                .map(|(id, (p, c, f))| FoodItem::new(id, format!("item-{id}"), p, c, f, None))
                .collect()
        },
    )
}

proptest! {
    /// Every returned score lies in [-1, 1] and the list is sorted descending.
    #[test]
    fn prop_scores_bounded_and_sorted(
        catalog in arb_catalog(),
        p in 0.1_f32..200.0,
        c in 0.1_f32..200.0,
    ) {
        let query = MacroQuery::new().with_protein(p).with_carb(c);
        let ranked = rank_by_similarity(&catalog, &query);

        for (s, _) in &ranked {
            prop_assert!(s.is_finite());
            prop_assert!((-1.0..=1.0).contains(s));
        }
        for w in ranked.windows(2) {
            prop_assert!(w[0].0 >= w[1].0);
        }
    }

    /// Ranking is a pure function of its inputs.
    #[test]
    fn prop_ranking_pure(catalog in arb_catalog(), p in 0.1_f32..200.0) {
        let query = MacroQuery::new().with_protein(p);
        let a = rank_by_similarity(&catalog, &query);
        let b = rank_by_similarity(&catalog, &query);

        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            prop_assert_eq!(x.0, y.0);
            prop_assert_eq!(x.1.id, y.1.id);
        }
    }

    /// The reference item never survives replacement ranking.
    #[test]
    fn prop_reference_excluded(catalog in arb_catalog(), reference in arb_item(0)) {
        let ranked = rank_replacements(&catalog, &reference);
        prop_assert!(ranked.iter().all(|(_, item)| item.id != reference.id));
    }

    /// A candidate identical to the full query scores at the top with
    /// similarity 1.
    #[test]
    fn prop_exact_match_tops(
        p in 0.5_f32..200.0,
        c in 0.5_f32..200.0,
        f in 0.5_f32..200.0,
    ) {
        let catalog = vec![
            FoodItem::new(0, "other", f, p, c, None),
            FoodItem::new(1, "exact", p, c, f, None),
        ];
        let query = MacroQuery::new().with_protein(p).with_carb(c).with_fat(f);
        let ranked = rank_by_similarity(&catalog, &query);

        prop_assert!(!ranked.is_empty());
        // acos drift near cos = 1 costs a few 1e-4 of score in f32
        prop_assert!((ranked[0].0 - 1.0).abs() < 1e-2);
    }
}
