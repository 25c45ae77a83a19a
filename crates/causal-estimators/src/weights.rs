//! Weight diagnostics

use causal_core::utils;
use serde::Serialize;
use std::fmt;

/// Distribution of inverse-probability weights
///
/// Stabilized weights should average close to 1; very large maxima
/// signal near-violations of positivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSummary {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl WeightSummary {
    /// Summarize a slice of weights
    ///
    /// Non-finite weights propagate into `mean`, `std_dev` and `max`.
    pub fn from_weights(weights: &[f64]) -> Self {
        let (min, max) = weights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
                (lo.min(w), hi.max(w))
            });
        Self {
            n: weights.len(),
            mean: utils::mean(weights),
            std_dev: utils::std_dev(weights),
            min,
            max,
        }
    }
}

impl fmt::Display for WeightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.4} sd={:.4} min={:.4} max={:.4}",
            self.n, self.mean, self.std_dev, self.min, self.max
        )
    }
}
