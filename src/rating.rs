//! Ratings and the dense rating matrix.
//!
//! Ratings are ordinal 1–3 (dislike / neutral / like). The trainer consumes
//! them as a dense matrix `Y` of shape (n_items × n_users), zero where
//! unrated, together with an observed mask `R` where `R[i,u] = 1` iff
//! `Y[i,u] != 0`.
//!
//! Item and user identifiers must be dense non-negative integers: they index
//! matrix rows and columns directly. Callers sizing the matrix from a catalog
//! should use [`RatingMatrix::new`] with `last_id + 1` per axis.

use crate::error::{NutrirError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Lowest valid rating value.
pub const MIN_RATING: u8 = 1;
/// Highest valid rating value.
pub const MAX_RATING: u8 = 3;

/// A single user-item rating.
///
/// Ratings are unique per (item, user) pair; inserting a second rating for
/// the same pair replaces the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Rated item identifier (dense, matrix row).
    pub item_id: usize,
    /// Rating user identifier (dense, matrix column).
    pub user_id: usize,
    /// Ordinal value in 1..=3.
    pub value: u8,
}

/// Dense rating matrix with its observed mask.
///
/// # Examples
///
/// ```
/// use nutrir::rating::{Rating, RatingMatrix};
///
/// let ratings = [
///     Rating { item_id: 2, user_id: 0, value: 3 },
///     Rating { item_id: 0, user_id: 1, value: 1 },
/// ];
/// let matrix = RatingMatrix::from_ratings(&ratings).unwrap();
/// assert_eq!(matrix.y().shape(), (3, 2));
/// assert!(matrix.is_rated(2, 0));
/// assert!(!matrix.is_rated(1, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMatrix {
    y: Matrix<f32>,
    r: Matrix<f32>,
}

impl RatingMatrix {
    /// Creates an empty rating matrix sized for `n_items` x `n_users`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(n_items: usize, n_users: usize) -> Result<Self> {
        if n_items == 0 || n_users == 0 {
            return Err(NutrirError::InvalidRating {
                message: format!(
                    "rating matrix needs at least one item and one user, got {n_items}x{n_users}"
                ),
            });
        }
        Ok(Self {
            y: Matrix::zeros(n_items, n_users),
            r: Matrix::zeros(n_items, n_users),
        })
    }

    /// Builds a matrix sized to `max(id) + 1` per axis from a rating list.
    ///
    /// # Errors
    ///
    /// Returns an error on an empty list (the matrix cannot be sized) or on
    /// any invalid rating.
    pub fn from_ratings(ratings: &[Rating]) -> Result<Self> {
        if ratings.is_empty() {
            return Err(NutrirError::empty_input("ratings"));
        }
        let n_items = ratings.iter().map(|r| r.item_id).max().unwrap_or(0) + 1;
        let n_users = ratings.iter().map(|r| r.user_id).max().unwrap_or(0) + 1;
        let mut matrix = Self::new(n_items, n_users)?;
        for rating in ratings {
            matrix.insert(rating)?;
        }
        Ok(matrix)
    }

    /// Inserts a rating, replacing any previous rating for the same
    /// (item, user) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside 1..=3 or the identifiers
    /// fall outside the matrix.
    pub fn insert(&mut self, rating: &Rating) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating.value) {
            return Err(NutrirError::InvalidRating {
                message: format!(
                    "value {} outside {MIN_RATING}..={MAX_RATING}",
                    rating.value
                ),
            });
        }
        let (n_items, n_users) = self.y.shape();
        if rating.item_id >= n_items || rating.user_id >= n_users {
            return Err(NutrirError::InvalidRating {
                message: format!(
                    "ids ({}, {}) outside matrix {n_items}x{n_users}",
                    rating.item_id, rating.user_id
                ),
            });
        }
        self.y
            .set(rating.item_id, rating.user_id, f32::from(rating.value));
        self.r.set(rating.item_id, rating.user_id, 1.0);
        Ok(())
    }

    /// The rating matrix Y (zero where unrated).
    #[must_use]
    pub fn y(&self) -> &Matrix<f32> {
        &self.y
    }

    /// The observed mask R (1 where rated, 0 elsewhere).
    #[must_use]
    pub fn r(&self) -> &Matrix<f32> {
        &self.r
    }

    /// Number of item rows.
    #[must_use]
    pub fn n_items(&self) -> usize {
        self.y.n_rows()
    }

    /// Number of user columns.
    #[must_use]
    pub fn n_users(&self) -> usize {
        self.y.n_cols()
    }

    /// Whether the (item, user) cell holds an observed rating.
    #[must_use]
    pub fn is_rated(&self, item_id: usize, user_id: usize) -> bool {
        self.r.get(item_id, user_id) != 0.0
    }

    /// Number of items the user has rated.
    #[must_use]
    pub fn rated_count_for_user(&self, user_id: usize) -> usize {
        (0..self.n_items())
            .filter(|&i| self.is_rated(i, user_id))
            .count()
    }
}
