//! Limited-memory BFGS (L-BFGS) optimizer.
//!
//! L-BFGS is a quasi-Newton method that approximates the inverse Hessian from
//! a limited history of gradient information, avoiding the O(n²) storage of a
//! full Newton step. It is the solver behind the collaborative filtering
//! trainer, whose parameter vector grows with items + users.

use crate::primitives::Vector;

use super::line_search::{LineSearch, WolfeLineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer};

/// Limited-memory BFGS (L-BFGS) optimizer.
///
/// # Algorithm
///
/// 1. Compute gradient `g_k` = ∇`f(x_k)`
/// 2. Compute search direction `d_k` via two-loop recursion (approximates -H⁻¹·`g_k`)
/// 3. Find step size `α_k` via Wolfe line search
/// 4. Update x, store position/gradient differences for the next iteration
///
/// # Example
///
/// ```
/// use nutrir::optim::{ConvergenceStatus, Optimizer, LBFGS};
/// use nutrir::primitives::Vector;
///
/// let mut optimizer = LBFGS::new(100, 1e-5, 10);
///
/// let f = |x: &Vector<f32>| (x[0] - 2.0).powi(2);
/// let grad = |x: &Vector<f32>| Vector::from_slice(&[2.0 * (x[0] - 2.0)]);
///
/// let result = optimizer.minimize(f, grad, Vector::from_slice(&[0.0]));
/// assert_eq!(result.status, ConvergenceStatus::Converged);
/// assert!((result.solution[0] - 2.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct LBFGS {
    /// Maximum number of iterations
    max_iter: usize,
    /// Convergence tolerance (gradient norm)
    tol: f32,
    /// History size (number of correction pairs to store)
    m: usize,
    /// Line search strategy
    line_search: WolfeLineSearch,
    /// Position differences: `s_k` = x_{k+1} - `x_k`
    s_history: Vec<Vector<f32>>,
    /// Gradient differences: `y_k` = g_{k+1} - `g_k`
    y_history: Vec<Vector<f32>>,
}

impl LBFGS {
    /// Creates a new L-BFGS optimizer.
    ///
    /// # Arguments
    ///
    /// * `max_iter` - Maximum number of iterations (typical: 100-1000)
    /// * `tol` - Convergence tolerance for gradient norm (typical: 1e-5)
    /// * `m` - History size (typical: 5-20)
    #[must_use]
    pub fn new(max_iter: usize, tol: f32, m: usize) -> Self {
        Self {
            max_iter,
            tol,
            m,
            line_search: WolfeLineSearch::new(1e-4, 0.9, 50),
            s_history: Vec::with_capacity(m),
            y_history: Vec::with_capacity(m),
        }
    }

    /// Two-loop recursion computing the search direction -H⁻¹·grad.
    fn compute_direction(&self, grad: &Vector<f32>) -> Vector<f32> {
        let n = grad.len();
        let k = self.s_history.len();

        // q = -grad; with no history this is plain steepest descent
        let mut q = Vector::zeros(n);
        for i in 0..n {
            q[i] = -grad[i];
        }
        if k == 0 {
            return q;
        }

        let mut alpha = vec![0.0; k];
        let mut rho = vec![0.0; k];

        // Backward pass
        for i in (0..k).rev() {
            let s = &self.s_history[i];
            let y = &self.y_history[i];

            rho[i] = 1.0 / y.dot(s);
            alpha[i] = rho[i] * s.dot(&q);
            for j in 0..n {
                q[j] -= alpha[i] * y[j];
            }
        }

        // Scale by H_0 = (sᵀy) / (yᵀy) from the most recent pair
        let s_last = &self.s_history[k - 1];
        let y_last = &self.y_history[k - 1];
        let gamma = s_last.dot(y_last) / y_last.dot(y_last);

        let mut r = Vector::zeros(n);
        for i in 0..n {
            r[i] = gamma * q[i];
        }

        // Forward pass
        for i in 0..k {
            let s = &self.s_history[i];
            let y = &self.y_history[i];

            let beta = rho[i] * y.dot(&r);
            for j in 0..n {
                r[j] += s[j] * (alpha[i] - beta);
            }
        }

        r
    }

    fn result(
        &self,
        solution: Vector<f32>,
        objective_value: f32,
        iterations: usize,
        status: ConvergenceStatus,
        gradient_norm: f32,
        started: std::time::Instant,
    ) -> OptimizationResult {
        OptimizationResult {
            solution,
            objective_value,
            iterations,
            status,
            gradient_norm,
            elapsed_time: started.elapsed(),
        }
    }
}

impl Optimizer for LBFGS {
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f32>) -> OptimizationResult
    where
        F: Fn(&Vector<f32>) -> f32,
        G: Fn(&Vector<f32>) -> Vector<f32>,
    {
        let started = std::time::Instant::now();
        let n = x0.len();

        // Clear history from previous runs
        self.s_history.clear();
        self.y_history.clear();

        let mut x = x0;
        let mut fx = objective(&x);
        let mut grad = gradient(&x);
        let mut grad_norm = grad.norm();

        for iter in 0..self.max_iter {
            if grad_norm < self.tol {
                return self.result(x, fx, iter, ConvergenceStatus::Converged, grad_norm, started);
            }

            let d = self.compute_direction(&grad);
            let alpha = self.line_search.search(&objective, &gradient, &x, &d);

            if alpha < 1e-12 {
                return self.result(x, fx, iter, ConvergenceStatus::Stalled, grad_norm, started);
            }

            let mut x_new = Vector::zeros(n);
            for i in 0..n {
                x_new[i] = x[i] + alpha * d[i];
            }

            let fx_new = objective(&x_new);
            let grad_new = gradient(&x_new);

            if fx_new.is_nan() || fx_new.is_infinite() {
                return self.result(
                    x,
                    fx,
                    iter,
                    ConvergenceStatus::NumericalError,
                    grad_norm,
                    started,
                );
            }

            let mut s_k = Vector::zeros(n);
            let mut y_k = Vector::zeros(n);
            for i in 0..n {
                s_k[i] = x_new[i] - x[i];
                y_k[i] = grad_new[i] - grad[i];
            }

            // Only store pairs satisfying the curvature condition yᵀs > 0
            if y_k.dot(&s_k) > 1e-10 {
                if self.s_history.len() >= self.m {
                    self.s_history.remove(0);
                    self.y_history.remove(0);
                }
                self.s_history.push(s_k);
                self.y_history.push(y_k);
            }

            x = x_new;
            fx = fx_new;
            grad = grad_new;
            grad_norm = grad.norm();
        }

        self.result(
            x,
            fx,
            self.max_iter,
            ConvergenceStatus::MaxIterations,
            grad_norm,
            started,
        )
    }

    fn reset(&mut self) {
        self.s_history.clear();
        self.y_history.clear();
    }
}
