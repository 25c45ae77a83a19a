//! Bootstrap interval methods
//!
//! Each method turns the bootstrap values of one coordinate plus the
//! full-data point estimate into a confidence interval.

use crate::{asymptotic::normal_interval, ConfidenceInterval, ConfidenceLevel};
use causal_core::{utils, Error, Result};
use tracing::trace;

/// Method for calculating a confidence interval from bootstrap estimates
pub trait BootstrapMethod: Send + Sync {
    /// Calculate the interval for one coordinate
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval>;

    /// Method name for reports
    fn name(&self) -> &'static str;
}

/// Type-7 quantiles of the bootstrap values at the two tail probabilities
fn tail_quantiles(bootstrap_estimates: &[f64], confidence_level: f64) -> Result<(f64, f64)> {
    if bootstrap_estimates.is_empty() {
        return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
    }
    let tail = ConfidenceLevel::try_new(confidence_level)?.tail_probability();
    let sorted = utils::sorted(bootstrap_estimates);
    let lower = utils::quantile_sorted(&sorted, tail);
    let upper = utils::quantile_sorted(&sorted, 1.0 - tail);
    trace!(lower, upper, "tail quantiles");
    Ok((lower, upper))
}

/// Percentile bootstrap
///
/// The interval runs between the α/2 and 1 − α/2 percentiles of the
/// bootstrap distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let (lower, upper) = tail_quantiles(bootstrap_estimates, confidence_level)?;
        Ok(ConfidenceInterval::new(
            lower,
            upper,
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Normal-approximation bootstrap
///
/// Point estimate ± z times the bootstrap standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalBootstrap;

impl BootstrapMethod for NormalBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        if bootstrap_estimates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }
        let sd = utils::std_dev(bootstrap_estimates);
        if sd.is_nan() {
            // Non-finite replicates leave the spread undefined
            ConfidenceLevel::try_new(confidence_level)?;
            return Ok(ConfidenceInterval::new(f64::NAN, f64::NAN, original_estimate, confidence_level));
        }
        normal_interval(original_estimate, sd, confidence_level)
    }

    fn name(&self) -> &'static str {
        "Normal Bootstrap"
    }
}

/// Basic bootstrap
///
/// Uses the reflection principle: if θ̂ is the original estimate and q the
/// bootstrap percentiles, the interval is [2θ̂ - q_{1-α/2}, 2θ̂ - q_{α/2}]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicBootstrap;

impl BootstrapMethod for BasicBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let (q_lower, q_upper) = tail_quantiles(bootstrap_estimates, confidence_level)?;
        Ok(ConfidenceInterval::new(
            2.0 * original_estimate - q_upper,
            2.0 * original_estimate - q_lower,
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Basic Bootstrap"
    }
}

/// Interval method chosen at run time, e.g. from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMethod {
    #[default]
    Percentile,
    Normal,
    Basic,
}

impl BootstrapMethod for IntervalMethod {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        match self {
            Self::Percentile => PercentileBootstrap.calculate_interval(bootstrap_estimates, original_estimate, confidence_level),
            Self::Normal => NormalBootstrap.calculate_interval(bootstrap_estimates, original_estimate, confidence_level),
            Self::Basic => BasicBootstrap.calculate_interval(bootstrap_estimates, original_estimate, confidence_level),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Percentile => PercentileBootstrap.name(),
            Self::Normal => NormalBootstrap.name(),
            Self::Basic => BasicBootstrap.name(),
        }
    }
}
