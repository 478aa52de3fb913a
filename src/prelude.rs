//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use nutrir::prelude::*;
//! ```

pub use crate::error::{NutrirError, Result};
pub use crate::food::{FoodItem, MacroQuery};
pub use crate::primitives::{Matrix, Vector};
pub use crate::rating::{Rating, RatingMatrix};
pub use crate::recommend::{
    rank_by_similarity, rank_replacements, CollaborativeFilter, FactorizedModel, ItemCatalog,
};
