//! Core traits for causal-effect estimation
//!
//! Two seams are defined here:
//!
//! - [`Estimator`]: anything that maps a dataset to a fixed-length vector
//!   of estimates. The bootstrap engine only ever talks to this trait, so
//!   new estimator compositions never require engine changes.
//! - [`ModelFitter`] / [`FittedModel`]: the opaque "fit a model, predict
//!   values" capability that outcome and propensity models provide.

use crate::{Dataset, Error, Result};

/// Scalar or fixed-length vector of estimates produced for one dataset
pub type EstimateVector = Vec<f64>;

/// A deterministic estimator over a dataset
///
/// Implementations must not carry hidden randomness: the bootstrap
/// distribution should be attributable to resampling alone.
pub trait Estimator: Send + Sync {
    /// Compute the estimate vector for `data`
    ///
    /// The returned vector must have exactly [`Estimator::dimension`]
    /// elements.
    fn estimate(&self, data: &Dataset) -> Result<EstimateVector>;

    /// Number of coordinates in every estimate vector
    fn dimension(&self) -> usize;

    /// Human-readable name of the estimator
    fn name(&self) -> &str;

    /// Coordinate labels, one per dimension
    fn labels(&self) -> Vec<String> {
        (0..self.dimension()).map(|i| format!("estimate_{i}")).collect()
    }
}

/// A model fitted to one dataset that can predict for any dataset with
/// the same covariate schema
pub trait FittedModel: Send + Sync {
    /// Predicted mean response (outcome value or exposure probability)
    /// for every row of `data`
    fn predict(&self, data: &Dataset) -> Result<Vec<f64>>;
}

/// Fits an outcome or exposure model to a dataset
pub trait ModelFitter: Send + Sync {
    /// The fitted model type
    type Fitted: FittedModel;

    /// Fit the model to `data`
    ///
    /// Rows with a missing response are ignored during fitting.
    fn fit(&self, data: &Dataset) -> Result<Self::Fitted>;

    /// Fit the model to `data` and predict for `data`
    fn fit_predict(&self, data: &Dataset) -> Result<Vec<f64>> {
        self.fit(data)?.predict(data)
    }
}

/// Estimator backed by a closure
///
/// Handy for ad-hoc statistics and tests.
///
/// # Example
///
/// ```rust
/// use causal_core::{estimator_fn, utils, Dataset, Estimator};
///
/// let data = Dataset::builder()
///     .numeric("y", vec![1.0, 2.0, 3.0])
///     .build()
///     .unwrap();
///
/// let mean_y = estimator_fn("mean_y", 1, |d: &Dataset| Ok(vec![utils::mean(d.numeric("y")?)]));
/// assert_eq!(mean_y.estimate(&data).unwrap(), vec![2.0]);
/// ```
#[derive(Clone)]
pub struct FnEstimator<F> {
    name: String,
    labels: Vec<String>,
    f: F,
}

impl<F> FnEstimator<F>
where
    F: Fn(&Dataset) -> Result<EstimateVector> + Send + Sync,
{
    /// Create a closure estimator with `dimension` coordinates
    pub fn new(name: impl Into<String>, dimension: usize, f: F) -> Self {
        Self {
            name: name.into(),
            labels: (0..dimension).map(|i| format!("estimate_{i}")).collect(),
            f,
        }
    }

    /// Replace the default coordinate labels
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.labels.len() {
            return Err(Error::size_mismatch(self.labels.len(), labels.len(), "estimator labels"));
        }
        self.labels = labels;
        Ok(self)
    }
}

impl<F> Estimator for FnEstimator<F>
where
    F: Fn(&Dataset) -> Result<EstimateVector> + Send + Sync,
{
    fn estimate(&self, data: &Dataset) -> Result<EstimateVector> {
        (self.f)(data)
    }

    fn dimension(&self) -> usize {
        self.labels.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }
}

/// Convenience constructor for [`FnEstimator`]
pub fn estimator_fn<F>(name: impl Into<String>, dimension: usize, f: F) -> FnEstimator<F>
where
    F: Fn(&Dataset) -> Result<EstimateVector> + Send + Sync,
{
    FnEstimator::new(name, dimension, f)
}
