//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the numeric foundation for the similarity engine
//! and the collaborative filtering trainer.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
