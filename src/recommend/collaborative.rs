//! Collaborative filtering via latent-factor matrix factorization.
//!
//! Given the dense rating matrix Y and its observed mask R, the trainer
//! learns item factors `X` (n_items × k) and user factors `Θ` (n_users × k)
//! by minimizing the regularized squared reconstruction error over observed
//! cells:
//!
//! ```text
//! cost(X, Θ) = ½·Σ R∘(X·Θᵀ − Y)²  +  (λ/2)·(‖X‖_F² + ‖Θ‖_F²)
//! ```
//!
//! Both factor matrices are flattened row-major, items first, into one
//! parameter vector for the quasi-Newton solver; the analytic gradient is
//! supplied in the same layout. There is no persisted model: training runs
//! fresh per request and the result is discarded after ranking.
//!
//! Training is CPU-bound and potentially slow; in a server context run it
//! off the request-handling thread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{NutrirError, Result};
use crate::food::FoodItem;
use crate::optim::{ConvergenceStatus, Optimizer, LBFGS};
use crate::primitives::{Matrix, Vector};
use crate::rating::RatingMatrix;

use super::ItemCatalog;

/// Collaborative filtering trainer configuration.
///
/// # Examples
///
/// ```
/// use nutrir::rating::{Rating, RatingMatrix};
/// use nutrir::recommend::CollaborativeFilter;
///
/// let ratings = RatingMatrix::from_ratings(&[
///     Rating { item_id: 2, user_id: 0, value: 3 },
/// ]).unwrap();
///
/// let trainer = CollaborativeFilter::new().with_random_state(42);
/// let model = trainer.fit(&ratings).unwrap();
///
/// // Predictions are well-defined everywhere, even for a single rating
/// let preds = model.predictions();
/// assert!(preds.as_slice().iter().all(|p| p.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct CollaborativeFilter {
    /// Number of latent features per item/user.
    n_features: usize,
    /// L2 regularization strength.
    lambda: f32,
    /// Solver iteration cap.
    max_iter: usize,
    /// Solver gradient-norm tolerance.
    tol: f32,
    /// Random seed for factor initialization.
    random_state: Option<u64>,
}

impl Default for CollaborativeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CollaborativeFilter {
    /// Creates a trainer with the default configuration
    /// (10 features, λ = 10, 200 iterations, tolerance 1e-4, entropy seed).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_features: 10,
            lambda: 10.0,
            max_iter: 200,
            tol: 1e-4,
            random_state: None,
        }
    }

    /// Sets the number of latent features.
    #[must_use]
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    /// Sets the L2 regularization strength.
    #[must_use]
    pub fn with_lambda(mut self, lambda: f32) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the solver gradient-norm tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed, making training reproducible.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Trains factor matrices on the given ratings.
    ///
    /// Non-convergence is not an error: the best-effort factors are returned
    /// with the solver's status attached.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid hyperparameters.
    pub fn fit(&self, ratings: &RatingMatrix) -> Result<FactorizedModel> {
        if self.n_features == 0 {
            return Err(NutrirError::InvalidHyperparameter {
                param: "n_features".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.lambda < 0.0 {
            return Err(NutrirError::InvalidHyperparameter {
                param: "lambda".to_string(),
                value: format!("{}", self.lambda),
                constraint: ">= 0".to_string(),
            });
        }

        let n_items = ratings.n_items();
        let n_users = ratings.n_users();
        let k = self.n_features;

        // X and Theta initialized uniform in [0, 1), already flattened
        // items-first
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let x0: Vec<f32> = (0..(n_items + n_users) * k)
            .map(|_| rng.gen_range(0.0..1.0))
            .collect();

        let y = ratings.y();
        let r = ratings.r();
        let lambda = self.lambda;

        let objective =
            |params: &Vector<f32>| cost(params, n_items, n_users, k, y, r, lambda)
                .expect("rating and factor shapes agree by construction");
        let grad = |params: &Vector<f32>| {
            gradient(params, n_items, n_users, k, y, r, lambda)
                .expect("rating and factor shapes agree by construction")
        };

        let mut solver = LBFGS::new(self.max_iter, self.tol, 10);
        let outcome = solver.minimize(objective, grad, Vector::from_vec(x0));

        let (x, theta) = unflatten(&outcome.solution, n_items, n_users, k);
        Ok(FactorizedModel {
            x,
            theta,
            status: outcome.status,
            iterations: outcome.iterations,
            objective_value: outcome.objective_value,
        })
    }
}

/// Learned item and user factor matrices, with training diagnostics.
#[derive(Debug, Clone)]
pub struct FactorizedModel {
    x: Matrix<f32>,
    theta: Matrix<f32>,
    /// Solver termination status.
    pub status: ConvergenceStatus,
    /// Solver iterations performed.
    pub iterations: usize,
    /// Final cost value.
    pub objective_value: f32,
}

impl FactorizedModel {
    /// Builds a model from precomputed factor matrices.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor matrices disagree on feature count.
    pub fn from_factors(x: Matrix<f32>, theta: Matrix<f32>) -> Result<Self> {
        if x.n_cols() != theta.n_cols() {
            return Err(NutrirError::dimension_mismatch(
                "n_features",
                x.n_cols(),
                theta.n_cols(),
            ));
        }
        Ok(Self {
            x,
            theta,
            status: ConvergenceStatus::Converged,
            iterations: 0,
            objective_value: 0.0,
        })
    }

    /// Item factor matrix X (n_items × k).
    #[must_use]
    pub fn item_factors(&self) -> &Matrix<f32> {
        &self.x
    }

    /// User factor matrix Θ (n_users × k).
    #[must_use]
    pub fn user_factors(&self) -> &Matrix<f32> {
        &self.theta
    }

    /// Predicted preference for a single (item, user) pair: X[i]·Θ[u].
    #[must_use]
    pub fn predict(&self, item_id: usize, user_id: usize) -> f32 {
        self.x.row(item_id).dot(&self.theta.row(user_id))
    }

    /// The full prediction matrix X·Θᵀ (n_items × n_users).
    #[must_use]
    pub fn predictions(&self) -> Matrix<f32> {
        self.x
            .matmul(&self.theta.transpose())
            .expect("factor shapes agree by construction")
    }

    /// Ranks unrated items for a user, most-recommended first, resolving
    /// indices through the catalog.
    ///
    /// Observed cells are masked out before ranking, the lowest-ranked
    /// `rated_count` entries are dropped (the recommendation list shrinks as
    /// the user rates more), already-rated indices never appear, and stale
    /// identifiers the catalog no longer knows are silently skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the rating matrix does not match the factor
    /// shapes or the user identifier is out of range.
    pub fn recommend(
        &self,
        ratings: &RatingMatrix,
        user_id: usize,
        catalog: &impl ItemCatalog,
    ) -> Result<Vec<FoodItem>> {
        let n_items = self.x.n_rows();
        let n_users = self.theta.n_rows();
        if ratings.n_items() != n_items || ratings.n_users() != n_users {
            return Err(NutrirError::DimensionMismatch {
                expected: format!("{n_items}x{n_users}"),
                actual: format!("{}x{}", ratings.n_items(), ratings.n_users()),
            });
        }
        if user_id >= n_users {
            return Err(NutrirError::Other(format!(
                "user_id {user_id} out of range (n_users={n_users})"
            )));
        }

        // Observed cells are zeroed so only unrated items compete
        let mut scored: Vec<(f32, usize)> = (0..n_items)
            .map(|item_id| {
                let score = if ratings.is_rated(item_id, user_id) {
                    0.0
                } else {
                    self.predict(item_id, user_id)
                };
                (score, item_id)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        // Reserve as many slots at the bottom as the user has ratings
        let rated_count = ratings.rated_count_for_user(user_id);
        let keep = scored.len().saturating_sub(rated_count);

        let mut items = Vec::with_capacity(keep);
        for &(_, item_id) in scored.iter().take(keep) {
            if ratings.is_rated(item_id, user_id) {
                continue;
            }
            if let Some(item) = catalog.item(item_id) {
                items.push(item.clone());
            }
        }
        Ok(items)
    }
}

/// Splits the flattened parameter vector back into (X, Θ).
fn unflatten(
    params: &Vector<f32>,
    n_items: usize,
    n_users: usize,
    k: usize,
) -> (Matrix<f32>, Matrix<f32>) {
    let flat = params.as_slice();
    let split = n_items * k;
    let x = Matrix::from_vec(n_items, k, flat[..split].to_vec())
        .expect("parameter vector sized to factor shapes");
    let theta = Matrix::from_vec(n_users, k, flat[split..].to_vec())
        .expect("parameter vector sized to factor shapes");
    (x, theta)
}

/// Masked reconstruction error: R∘(X·Θᵀ − Y).
fn residual(
    x: &Matrix<f32>,
    theta: &Matrix<f32>,
    y: &Matrix<f32>,
    r: &Matrix<f32>,
) -> std::result::Result<Matrix<f32>, &'static str> {
    x.matmul(&theta.transpose())?.sub(y)?.hadamard(r)
}

fn cost(
    params: &Vector<f32>,
    n_items: usize,
    n_users: usize,
    k: usize,
    y: &Matrix<f32>,
    r: &Matrix<f32>,
    lambda: f32,
) -> std::result::Result<f32, &'static str> {
    let (x, theta) = unflatten(params, n_items, n_users, k);
    let e = residual(&x, &theta, y, r)?;
    Ok(0.5 * e.frobenius_sq() + 0.5 * lambda * (x.frobenius_sq() + theta.frobenius_sq()))
}

fn gradient(
    params: &Vector<f32>,
    n_items: usize,
    n_users: usize,
    k: usize,
    y: &Matrix<f32>,
    r: &Matrix<f32>,
    lambda: f32,
) -> std::result::Result<Vector<f32>, &'static str> {
    let (x, theta) = unflatten(params, n_items, n_users, k);
    let e = residual(&x, &theta, y, r)?;

    let x_grad = e.matmul(&theta)?.add(&x.mul_scalar(lambda))?;
    let theta_grad = e.transpose().matmul(&x)?.add(&theta.mul_scalar(lambda))?;

    // Same items-first layout as the parameter vector
    let mut flat = Vec::with_capacity((n_items + n_users) * k);
    flat.extend_from_slice(x_grad.as_slice());
    flat.extend_from_slice(theta_grad.as_slice());
    Ok(Vector::from_vec(flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::Rating;

    fn rating(item_id: usize, user_id: usize, value: u8) -> Rating {
        Rating {
            item_id,
            user_id,
            value,
        }
    }

    fn catalog(n: usize) -> Vec<FoodItem> {
        (0..n)
            .map(|id| {
                FoodItem::new(
                    id,
                    format!("item-{id}"),
                    10.0 + id as f32,
                    20.0,
                    5.0,
                    None,
                )
            })
            .collect()
    }

    #[test]
    fn test_invalid_n_features_rejected() {
        let ratings = RatingMatrix::from_ratings(&[rating(0, 0, 2)]).unwrap();
        let trainer = CollaborativeFilter::new().with_n_features(0);
        assert!(trainer.fit(&ratings).is_err());
    }

    #[test]
    fn test_negative_lambda_rejected() {
        let ratings = RatingMatrix::from_ratings(&[rating(0, 0, 2)]).unwrap();
        let trainer = CollaborativeFilter::new().with_lambda(-1.0);
        assert!(trainer.fit(&ratings).is_err());
    }

    #[test]
    fn test_single_rating_trains_without_nan() {
        // Y[2,0]=3 is the only observation; everything must stay finite
        let ratings = RatingMatrix::from_ratings(&[rating(2, 0, 3)]).unwrap();
        let trainer = CollaborativeFilter::new().with_random_state(7);
        let model = trainer.fit(&ratings).unwrap();

        let preds = model.predictions();
        assert_eq!(preds.shape(), (3, 1));
        assert!(preds.as_slice().iter().all(|p| p.is_finite()));
        assert!(model.objective_value.is_finite());
    }

    #[test]
    fn test_seeded_training_reproducible() {
        let ratings = RatingMatrix::from_ratings(&[
            rating(0, 0, 3),
            rating(1, 0, 1),
            rating(2, 1, 2),
            rating(3, 1, 3),
        ])
        .unwrap();
        let trainer = CollaborativeFilter::new().with_random_state(42);

        let a = trainer.fit(&ratings).unwrap();
        let b = trainer.fit(&ratings).unwrap();
        assert_eq!(a.predictions(), b.predictions());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let ratings = RatingMatrix::from_ratings(&[
            rating(0, 0, 3),
            rating(1, 1, 2),
            rating(2, 0, 1),
        ])
        .unwrap();
        let (n_items, n_users, k) = (3, 2, 2);
        let y = ratings.y();
        let r = ratings.r();
        let lambda = 1.5;

        let params = Vector::from_vec(
            (0..(n_items + n_users) * k)
                .map(|i| 0.1 + 0.07 * i as f32)
                .collect(),
        );
        let g = gradient(&params, n_items, n_users, k, y, r, lambda).unwrap();

        let h = 1e-3;
        for i in 0..params.len() {
            let mut plus = params.clone();
            plus[i] += h;
            let mut minus = params.clone();
            minus[i] -= h;
            let numeric = (cost(&plus, n_items, n_users, k, y, r, lambda).unwrap()
                - cost(&minus, n_items, n_users, k, y, r, lambda).unwrap())
                / (2.0 * h);
            assert!(
                (g[i] - numeric).abs() < 1e-1,
                "component {i}: analytic {} vs numeric {numeric}",
                g[i]
            );
        }
    }

    #[test]
    fn test_recommend_excludes_rated_items() {
        let ratings = RatingMatrix::from_ratings(&[
            rating(0, 0, 3),
            rating(2, 0, 1),
            rating(1, 1, 2),
        ])
        .unwrap();
        let trainer = CollaborativeFilter::new().with_random_state(3);
        let model = trainer.fit(&ratings).unwrap();

        let items = catalog(3);
        let recs = model.recommend(&ratings, 0, &items).unwrap();
        assert!(recs.iter().all(|i| i.id != 0 && i.id != 2));
    }

    #[test]
    fn test_recommend_truncates_by_rated_count() {
        // Hand-built factors with all-positive predictions make the
        // truncation arithmetic exact: 4 items, 1 rated -> 3 slots
        let x = Matrix::from_vec(4, 1, vec![4.0, 3.0, 2.0, 1.0]).unwrap();
        let theta = Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap();
        let model = FactorizedModel::from_factors(x, theta).unwrap();

        let mut ratings = RatingMatrix::new(4, 2).unwrap();
        ratings.insert(&rating(0, 0, 3)).unwrap();

        let items = catalog(4);
        let recs = model.recommend(&ratings, 0, &items).unwrap();
        assert_eq!(recs.len(), 3);
        // Best remaining prediction first, rated item absent
        assert_eq!(recs[0].id, 1);
        assert_eq!(recs[1].id, 2);
        assert_eq!(recs[2].id, 3);
    }

    #[test]
    fn test_recommend_skips_stale_ids() {
        let x = Matrix::from_vec(3, 1, vec![3.0, 2.0, 1.0]).unwrap();
        let theta = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        let model = FactorizedModel::from_factors(x, theta).unwrap();

        let ratings = RatingMatrix::new(3, 1).unwrap();
        // Item 1 deleted from the catalog after the matrix was built
        let items: Vec<FoodItem> = catalog(3)
            .into_iter()
            .filter(|i| i.id != 1)
            .collect();

        let recs = model.recommend(&ratings, 0, &items).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, 0);
        assert_eq!(recs[1].id, 2);
    }

    #[test]
    fn test_recommend_rejects_mismatched_shapes() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 1.0, 1.0]).unwrap();
        let theta = Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap();
        let model = FactorizedModel::from_factors(x, theta).unwrap();

        let ratings = RatingMatrix::new(4, 2).unwrap();
        assert!(model.recommend(&ratings, 0, &catalog(4)).is_err());

        let ratings = RatingMatrix::new(3, 2).unwrap();
        assert!(model.recommend(&ratings, 5, &catalog(3)).is_err());
    }

    #[test]
    fn test_from_factors_rejects_feature_mismatch() {
        let x = Matrix::zeros(2, 3);
        let theta = Matrix::zeros(2, 4);
        assert!(FactorizedModel::from_factors(x, theta).is_err());
    }

    #[test]
    fn test_predict_matches_prediction_matrix() {
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let theta = Matrix::from_vec(2, 2, vec![0.5, 0.5, 1.0, -1.0]).unwrap();
        let model = FactorizedModel::from_factors(x, theta).unwrap();

        let preds = model.predictions();
        for i in 0..2 {
            for u in 0..2 {
                assert!((model.predict(i, u) - preds.get(i, u)).abs() < 1e-6);
            }
        }
    }
}
