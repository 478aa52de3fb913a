//! Meal-replacement recommendation engines.
//!
//! Two independent algorithms:
//!
//! - **Content-based**: cosine similarity over macronutrient vectors,
//!   restricted to the query's present dimensions ([`similarity`]).
//! - **Collaborative filtering**: latent-factor matrix factorization trained
//!   per request from the full rating matrix ([`collaborative`]).
//!
//! # Quick Start
//!
//! ```
//! use nutrir::food::FoodItem;
//! use nutrir::recommend::similarity::rank_replacements;
//!
//! let catalog = vec![
//!     FoodItem::new(0, "chicken", 31.0, 0.0, 3.6, None),
//!     FoodItem::new(1, "turkey", 29.0, 0.0, 7.0, None),
//!     FoodItem::new(2, "pasta", 5.0, 25.0, 1.1, None),
//! ];
//!
//! let ranked = rank_replacements(&catalog, &catalog[0]);
//!
//! // The reference item never appears in its own replacements
//! assert!(ranked.iter().all(|(_, item)| item.id != 0));
//! // Turkey beats pasta as a chicken replacement
//! assert_eq!(ranked[0].1.id, 1);
//! ```

use crate::food::FoodItem;
use std::collections::HashMap;

pub mod collaborative;
pub mod similarity;

pub use collaborative::{CollaborativeFilter, FactorizedModel};
pub use similarity::{rank_by_similarity, rank_replacements};

/// Catalog lookup contract for resolving recommended item indices.
///
/// The trainer ranks raw matrix indices; resolution may encounter stale
/// identifiers (an item deleted between matrix construction and lookup), so
/// `item` returns `None` rather than failing.
pub trait ItemCatalog {
    /// Fetches the item with the given identifier, if it still exists.
    fn item(&self, id: usize) -> Option<&FoodItem>;
}

impl ItemCatalog for [FoodItem] {
    fn item(&self, id: usize) -> Option<&FoodItem> {
        self.iter().find(|item| item.id == id)
    }
}

impl ItemCatalog for Vec<FoodItem> {
    fn item(&self, id: usize) -> Option<&FoodItem> {
        self.as_slice().item(id)
    }
}

impl ItemCatalog for HashMap<usize, FoodItem> {
    fn item(&self, id: usize) -> Option<&FoodItem> {
        self.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_catalog_lookup() {
        let items = vec![
            FoodItem::new(3, "a", 1.0, 2.0, 3.0, None),
            FoodItem::new(7, "b", 4.0, 5.0, 6.0, None),
        ];
        assert_eq!(items.item(7).map(|i| i.name.as_str()), Some("b"));
        assert!(items.item(5).is_none());
    }

    #[test]
    fn test_map_catalog_lookup() {
        let mut map = HashMap::new();
        map.insert(2, FoodItem::new(2, "c", 1.0, 1.0, 1.0, None));
        assert!(map.item(2).is_some());
        assert!(map.item(0).is_none());
    }
}
