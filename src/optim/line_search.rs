//! Line search strategies for batch optimizers.
//!
//! Given a function f, current point x, and search direction d, a line search
//! picks a step size α > 0 such that x + α·d satisfies decrease conditions.

use crate::primitives::Vector;

/// Trait for line search strategies.
pub trait LineSearch {
    /// Finds a suitable step size along the search direction.
    ///
    /// # Arguments
    ///
    /// * `f` - Objective function f: ℝⁿ → ℝ
    /// * `grad` - Gradient function ∇f: ℝⁿ → ℝⁿ
    /// * `x` - Current point
    /// * `d` - Search direction (typically descent direction, ∇f(x)·d < 0)
    ///
    /// # Returns
    ///
    /// Step size α > 0 satisfying the line search conditions
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f32>, d: &Vector<f32>) -> f32
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>;
}

/// Wolfe line search with Armijo and curvature conditions.
///
/// Enforces sufficient decrease and sufficient curvature:
///
/// ```text
/// Armijo:    f(x + α·d) ≤ f(x) + c₁·α·∇f(x)ᵀd
/// Curvature: |∇f(x + α·d)ᵀd| ≤ c₂·|∇f(x)ᵀd|
/// ```
///
/// The curvature condition keeps the step from being too small, which is what
/// quasi-Newton methods need for their curvature-pair updates.
///
/// # Example
///
/// ```
/// use nutrir::optim::{LineSearch, WolfeLineSearch};
/// use nutrir::primitives::Vector;
///
/// let line_search = WolfeLineSearch::new(1e-4, 0.9, 50);
///
/// let f = |x: &Vector<f32>| x[0] * x[0];
/// let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0]]);
///
/// let x = Vector::from_slice(&[1.0]);
/// let d = Vector::from_slice(&[-2.0]);
///
/// let alpha = line_search.search(&f, &grad, &x, &d);
/// assert!(alpha > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct WolfeLineSearch {
    /// Armijo constant (c₁ ∈ (0, c₂), typical: 1e-4)
    c1: f32,
    /// Curvature constant (c₂ ∈ (c₁, 1), typical: 0.9)
    c2: f32,
    /// Maximum line search iterations
    max_iter: usize,
}

impl WolfeLineSearch {
    /// Creates a new Wolfe line search.
    ///
    /// # Arguments
    ///
    /// * `c1` - Armijo constant (typical: 1e-4)
    /// * `c2` - Curvature constant (typical: 0.9)
    /// * `max_iter` - Maximum iterations (typical: 50)
    ///
    /// # Panics
    ///
    /// Panics if c1 >= c2 or values are outside (0, 1).
    #[must_use]
    pub fn new(c1: f32, c2: f32, max_iter: usize) -> Self {
        assert!(
            c1 < c2 && c1 > 0.0 && c2 < 1.0,
            "Wolfe conditions require 0 < c1 < c2 < 1"
        );
        Self { c1, c2, max_iter }
    }
}

impl Default for WolfeLineSearch {
    /// Defaults: c1=1e-4, c2=0.9, `max_iter=50`
    fn default() -> Self {
        Self::new(1e-4, 0.9, 50)
    }
}

impl LineSearch for WolfeLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f32>, d: &Vector<f32>) -> f32
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        let mut alpha_lo = 0.0;
        let mut alpha_hi = f32::INFINITY;

        for _ in 0..self.max_iter {
            let mut x_new = Vector::zeros(x.len());
            for i in 0..x.len() {
                x_new[i] = x[i] + alpha * d[i];
            }

            let fx_new = f(&x_new);
            let dir_deriv_new = grad(&x_new).dot(d);

            // Armijo condition
            if fx_new > fx + self.c1 * alpha * dir_deriv {
                alpha_hi = alpha;
                alpha = (alpha_lo + alpha_hi) / 2.0;
                continue;
            }

            // Curvature condition
            if dir_deriv_new.abs() <= self.c2 * dir_deriv.abs() {
                return alpha;
            }

            if dir_deriv_new > 0.0 {
                alpha_hi = alpha;
            } else {
                alpha_lo = alpha;
            }

            if alpha_hi.is_finite() {
                alpha = (alpha_lo + alpha_hi) / 2.0;
            } else {
                alpha *= 2.0;
            }
        }

        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wolfe_quadratic() {
        let ls = WolfeLineSearch::default();
        let f = |x: &Vector<f32>| x[0] * x[0];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0]]);

        let x = Vector::from_slice(&[1.0]);
        let d = Vector::from_slice(&[-2.0]);

        let alpha = ls.search(&f, &grad, &x, &d);
        assert!(alpha > 0.0);
    }

    #[test]
    fn test_wolfe_ensures_decrease() {
        let ls = WolfeLineSearch::new(1e-4, 0.9, 100);
        let f = |x: &Vector<f32>| x[0] * x[0] + x[1] * x[1];
        let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * x[0], 2.0 * x[1]]);

        let x = Vector::from_slice(&[5.0, -3.0]);
        let g = grad(&x);
        let d = Vector::from_slice(&[-g[0], -g[1]]);

        let alpha = ls.search(&f, &grad, &x, &d);

        let mut x_new = Vector::zeros(2);
        for i in 0..2 {
            x_new[i] = x[i] + alpha * d[i];
        }
        assert!(f(&x_new) < f(&x));
    }

    #[test]
    #[should_panic(expected = "Wolfe conditions")]
    fn test_wolfe_invalid_constants_panic() {
        let _ = WolfeLineSearch::new(0.9, 0.1, 50);
    }
}
