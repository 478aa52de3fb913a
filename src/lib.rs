//! Nutrir: meal-replacement recommendation core in pure Rust.
//!
//! Nutrir provides the two recommendation engines behind a diet tracker:
//! content-based similarity search over macronutrient vectors, and a
//! collaborative filtering recommender trained per request by matrix
//! factorization.
//!
//! # Quick Start
//!
//! ```
//! use nutrir::prelude::*;
//!
//! // Candidate meals (per-100g macros; calories derived when omitted)
//! let catalog = vec![
//!     FoodItem::new(0, "chicken breast", 31.0, 0.0, 3.6, None),
//!     FoodItem::new(1, "turkey breast", 29.0, 0.0, 7.0, None),
//!     FoodItem::new(2, "penne", 5.0, 25.0, 1.1, None),
//! ];
//!
//! // Content-based: rank replacements for a reference meal
//! let ranked = rank_replacements(&catalog, &catalog[0]);
//! assert_eq!(ranked[0].1.id, 1);
//!
//! // Collaborative: train on observed ratings, recommend unrated meals
//! let ratings = RatingMatrix::from_ratings(&[
//!     Rating { item_id: 0, user_id: 0, value: 3 },
//!     Rating { item_id: 2, user_id: 1, value: 2 },
//! ]).unwrap();
//!
//! let model = CollaborativeFilter::new()
//!     .with_random_state(42)
//!     .fit(&ratings)
//!     .unwrap();
//! let recs = model.recommend(&ratings, 0, &catalog).unwrap();
//! assert!(recs.iter().all(|item| item.id != 0));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`optim`]: Batch optimization (L-BFGS, Wolfe line search)
//! - [`food`]: Food entities and macronutrient queries
//! - [`rating`]: Ratings and the dense rating matrix
//! - [`recommend`]: Similarity ranking and collaborative filtering
//! - [`error`]: Error types
//!
//! # Identifiers as matrix indices
//!
//! Item and user identifiers must be dense non-negative integers; the
//! collaborative trainer uses them directly as matrix row/column indices.
//! Sparse identifier spaces silently produce oversized matrices.

pub mod error;
pub mod food;
pub mod optim;
pub mod prelude;
pub mod primitives;
pub mod rating;
pub mod recommend;
