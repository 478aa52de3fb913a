//! Food entities and macronutrient queries.
//!
//! A [`FoodItem`] is a candidate for similarity search and recommendation:
//! an identifier plus per-100g-equivalent macronutrient values. A
//! [`MacroQuery`] is the (possibly partial) set of macronutrient values a
//! similarity search compares candidates against.

use serde::{Deserialize, Serialize};

/// Derives calories from macronutrients using the Atwater factors
/// (4 kcal/g protein, 4 kcal/g carbohydrate, 9 kcal/g fat).
#[must_use]
pub fn atwater_calories(protein: f32, carb: f32, fat: f32) -> f32 {
    4.0 * protein + 4.0 * carb + 9.0 * fat
}

/// A food or meal record with macronutrient attributes.
///
/// Identifiers are dense non-negative integers: the collaborative filtering
/// trainer uses them directly as matrix row indices, so they must run
/// contiguously from 0 with no gaps larger than the catalog.
///
/// # Examples
///
/// ```
/// use nutrir::food::FoodItem;
///
/// // Calories derived from macros when not given explicitly
/// let oats = FoodItem::new(0, "oats", 13.0, 68.0, 7.0, None);
/// assert!((oats.calories - 387.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Dense identifier, usable as a matrix index.
    pub id: usize,
    /// Display name.
    pub name: String,
    /// Protein per 100g-equivalent, grams.
    pub protein: f32,
    /// Carbohydrate per 100g-equivalent, grams.
    pub carb: f32,
    /// Fat per 100g-equivalent, grams.
    pub fat: f32,
    /// Calories per 100g-equivalent, kcal.
    pub calories: f32,
}

impl FoodItem {
    /// Creates a food item, deriving calories from the Atwater factors
    /// when not provided.
    #[must_use]
    pub fn new(
        id: usize,
        name: impl Into<String>,
        protein: f32,
        carb: f32,
        fat: f32,
        calories: Option<f32>,
    ) -> Self {
        let calories = calories.unwrap_or_else(|| atwater_calories(protein, carb, fat));
        Self {
            id,
            name: name.into(),
            protein,
            carb,
            fat,
            calories,
        }
    }
}

/// A partial macronutrient query for similarity search.
///
/// Any subset of the four dimensions may be present; absent dimensions
/// contribute nothing to the similarity computation. `Some(0.0)` is a
/// present-and-zero dimension, distinct from `None`.
///
/// # Examples
///
/// ```
/// use nutrir::food::MacroQuery;
///
/// let query = MacroQuery::new().with_protein(20.0).with_carb(5.0);
/// assert!(query.fat.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroQuery {
    /// Protein target, grams.
    pub protein: Option<f32>,
    /// Carbohydrate target, grams.
    pub carb: Option<f32>,
    /// Fat target, grams.
    pub fat: Option<f32>,
    /// Calorie target, kcal.
    pub calories: Option<f32>,
}

impl MacroQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protein dimension.
    #[must_use]
    pub fn with_protein(mut self, protein: f32) -> Self {
        self.protein = Some(protein);
        self
    }

    /// Sets the carbohydrate dimension.
    #[must_use]
    pub fn with_carb(mut self, carb: f32) -> Self {
        self.carb = Some(carb);
        self
    }

    /// Sets the fat dimension.
    #[must_use]
    pub fn with_fat(mut self, fat: f32) -> Self {
        self.fat = Some(fat);
        self
    }

    /// Sets the calories dimension.
    #[must_use]
    pub fn with_calories(mut self, calories: f32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Builds a replacement query from a reference item.
    ///
    /// Uses protein, carb and fat only; calories stay out of the comparison
    /// when searching for a replacement of a known item.
    #[must_use]
    pub fn from_item(item: &FoodItem) -> Self {
        Self {
            protein: Some(item.protein),
            carb: Some(item.carb),
            fat: Some(item.fat),
            calories: None,
        }
    }

    /// Returns true if no dimension is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.protein.is_none()
            && self.carb.is_none()
            && self.fat.is_none()
            && self.calories.is_none()
    }

    /// Pairs each present query dimension with the candidate's value in
    /// that dimension.
    pub(crate) fn paired_with(self, item: &FoodItem) -> impl Iterator<Item = (f32, f32)> {
        [
            (self.protein, item.protein),
            (self.carb, item.carb),
            (self.fat, item.fat),
            (self.calories, item.calories),
        ]
        .into_iter()
        .filter_map(|(q, c)| q.map(|q| (q, c)))
    }
}
