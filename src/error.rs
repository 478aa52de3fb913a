//! Error types for nutrir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for nutrir operations.
///
/// Provides detailed context about failures including dimension mismatches,
/// invalid hyperparameters, and malformed ratings.
///
/// # Examples
///
/// ```
/// use nutrir::error::NutrirError;
///
/// let err = NutrirError::DimensionMismatch {
///     expected: "12x4".to_string(),
///     actual: "12x3".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum NutrirError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A rating outside the supported ordinal scale or matrix bounds.
    InvalidRating {
        /// Failure description
        message: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for NutrirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrirError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            NutrirError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            NutrirError::InvalidRating { message } => {
                write!(f, "Invalid rating: {message}")
            }
            NutrirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for NutrirError {}

impl From<&str> for NutrirError {
    fn from(msg: &str) -> Self {
        NutrirError::Other(msg.to_string())
    }
}

impl From<String> for NutrirError {
    fn from(msg: String) -> Self {
        NutrirError::Other(msg)
    }
}

impl NutrirError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, NutrirError>;
