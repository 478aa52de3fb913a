//! Batch optimization for gradient-based training.
//!
//! The collaborative filtering trainer minimizes a non-convex factorization
//! cost with a quasi-Newton solver. This module provides the [`Optimizer`]
//! trait for batch (full-gradient) minimization together with:
//!
//! - [`LBFGS`] - Limited-memory BFGS (memory-efficient quasi-Newton)
//! - [`WolfeLineSearch`] - Armijo + curvature conditions, behind [`LineSearch`]
//!
//! # Example
//!
//! ```
//! use nutrir::optim::{ConvergenceStatus, Optimizer, LBFGS};
//! use nutrir::primitives::Vector;
//!
//! let mut optimizer = LBFGS::new(100, 1e-5, 10);
//!
//! let objective = |x: &Vector<f32>| (x[0] - 5.0).powi(2) + (x[1] - 3.0).powi(2);
//! let gradient = |x: &Vector<f32>| {
//!     Vector::from_slice(&[2.0 * (x[0] - 5.0), 2.0 * (x[1] - 3.0)])
//! };
//!
//! let result = optimizer.minimize(objective, gradient, Vector::from_slice(&[0.0, 0.0]));
//!
//! assert_eq!(result.status, ConvergenceStatus::Converged);
//! assert!((result.solution[0] - 5.0).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

use crate::primitives::Vector;

mod lbfgs;
mod line_search;

pub use lbfgs::LBFGS;
pub use line_search::{LineSearch, WolfeLineSearch};

/// Result of an optimization procedure.
///
/// Contains the final solution, convergence information, and diagnostic metrics.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final solution (optimized parameters)
    pub solution: Vector<f32>,
    /// Final objective function value
    pub objective_value: f32,
    /// Number of iterations performed
    pub iterations: usize,
    /// Convergence status
    pub status: ConvergenceStatus,
    /// Final gradient norm (‖∇f(x)‖)
    pub gradient_norm: f32,
    /// Total elapsed time
    pub elapsed_time: std::time::Duration,
}

/// Convergence status of an optimization procedure.
///
/// Non-convergence is diagnostic, not an error: callers receive the
/// best-effort solution either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Converged (gradient norm < tolerance)
    Converged,
    /// Reached maximum iteration limit
    MaxIterations,
    /// Progress stalled (step size too small)
    Stalled,
    /// Numerical error (NaN, Inf, etc.)
    NumericalError,
}

/// Trait for batch (full-gradient) optimizers.
///
/// Implementations minimize an objective function given its analytic gradient
/// and return the complete convergence trajectory information.
pub trait Optimizer {
    /// Minimizes the objective starting from `x0`.
    ///
    /// # Arguments
    ///
    /// * `objective` - Objective function f: ℝⁿ → ℝ
    /// * `gradient` - Gradient function ∇f: ℝⁿ → ℝⁿ
    /// * `x0` - Initial point
    ///
    /// # Returns
    ///
    /// [`OptimizationResult`] with solution, convergence status, and diagnostics.
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f32>) -> OptimizationResult
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>;

    /// Resets the optimizer state (history, etc.).
    ///
    /// Call this when reusing an optimizer on a new problem.
    fn reset(&mut self);
}
