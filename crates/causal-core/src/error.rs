//! Error types for causal-effect estimation
//!
//! Provides a unified error type for all causal-stats crates.

use thiserror::Error;

/// Core error type for estimation and resampling operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data or call arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} rows, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A named column is missing from a dataset
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column exists but has the wrong kind for the operation
    #[error("Column {name} is not {expected}")]
    ColumnKind { name: String, expected: &'static str },

    /// The estimator failed on one bootstrap replicate
    #[error("Estimator failed on replicate {replicate}: {message}")]
    EstimatorFailure { replicate: usize, message: String },

    /// Model fitting failed (singular design, no convergence, ...)
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(operation: &str) -> Self {
        Self::InvalidInput(format!("{operation} requires at least one row"))
    }

    /// Create an error for a percentile outside [0, 100]
    pub fn invalid_percentile(p: f64) -> Self {
        Self::InvalidInput(format!("Percentile {p} must be in [0, 100]"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Wrap an estimator error with the replicate it occurred on
    pub fn estimator_failure(replicate: usize, source: &Error) -> Self {
        Self::EstimatorFailure {
            replicate,
            message: source.to_string(),
        }
    }

    /// Whether this error is a per-replicate estimator failure
    pub fn is_estimator_failure(&self) -> bool {
        matches!(self, Self::EstimatorFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("tolerance must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: tolerance must be positive");

        let err = Error::InvalidInput("replications must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: replications must be positive");

        let err = Error::InsufficientData { expected: 10, actual: 5 };
        assert_eq!(err.to_string(), "Insufficient data: expected at least 10 rows, got 5");

        let err = Error::ColumnNotFound("qsmk".to_string());
        assert_eq!(err.to_string(), "Column not found: qsmk");

        let err = Error::ColumnKind { name: "education".to_string(), expected: "numeric" };
        assert_eq!(err.to_string(), "Column education is not numeric");

        let err = Error::EstimatorFailure { replicate: 17, message: "singular".to_string() };
        assert_eq!(err.to_string(), "Estimator failed on replicate 17: singular");

        let err = Error::ModelFit("did not converge".to_string());
        assert_eq!(err.to_string(), "Model fit error: did not converge");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::empty_input("bootstrap");
        assert_eq!(err.to_string(), "Invalid input: bootstrap requires at least one row");

        let err = Error::invalid_percentile(101.0);
        assert_eq!(err.to_string(), "Invalid input: Percentile 101 must be in [0, 100]");

        let err = Error::size_mismatch(4, 3, "estimate vector");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in estimate vector: expected 4, got 3"
        );
    }

    #[test]
    fn test_estimator_failure_wrapping() {
        let inner = Error::ModelFit("singular design matrix".to_string());
        let err = Error::estimator_failure(3, &inner);
        assert!(err.is_estimator_failure());
        match err {
            Error::EstimatorFailure { replicate, message } => {
                assert_eq!(replicate, 3);
                assert!(message.contains("singular design matrix"));
            }
            _ => panic!("Wrong error type"),
        }
        assert!(!inner.is_estimator_failure());
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => {
                assert!(err.to_string().contains("custom error message"));
            }
            _ => panic!("Wrong error type"),
        }
    }
}
