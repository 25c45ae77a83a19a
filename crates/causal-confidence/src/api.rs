//! High-level API for bootstrap confidence intervals
//!
//! [`bootstrap_confidence_intervals`] is the one-call entry point: point
//! estimate on the full data, bootstrap distribution, summary and one
//! interval per coordinate.

use crate::{
    summarize, BootstrapConfig, BootstrapDistribution, BootstrapEngine, BootstrapMethod,
    ConfidenceInterval, SummaryStatistics,
};
use causal_core::{Dataset, EstimateVector, Error, Estimator, Result};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument};

/// Run the bootstrap with the default configuration, `replications`
/// replicates and `seed`
///
/// # Example
///
/// ```rust
/// use causal_confidence::{run, summarize};
/// use causal_core::{estimator_fn, utils, Dataset};
///
/// let data = Dataset::builder()
///     .numeric("y", vec![2.0, 4.0, 6.0, 8.0])
///     .build()
///     .unwrap();
/// let mean_y = estimator_fn("mean_y", 1, |d: &Dataset| Ok(vec![utils::mean(d.numeric("y")?)]));
///
/// let dist = run(&data, &mean_y, 1000, 42).unwrap();
/// let summary = summarize(&dist, &[2.5, 97.5]).unwrap();
/// assert!((summary.coordinates[0].mean - 5.0).abs() < 0.2);
/// ```
pub fn run<E>(dataset: &Dataset, estimator: &E, replications: usize, seed: u64) -> Result<BootstrapDistribution>
where
    E: Estimator + ?Sized,
{
    BootstrapEngine::new()
        .with_replications(replications)
        .with_seed(seed)
        .run(dataset, estimator)
}

/// Point estimates, bootstrap summary and intervals for every coordinate
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapResult {
    /// Estimates on the full dataset
    pub estimates: EstimateVector,
    /// Coordinate labels
    pub labels: Vec<String>,
    /// One interval per coordinate
    pub intervals: Vec<ConfidenceInterval>,
    /// Bootstrap mean, SD and tail percentiles per coordinate
    pub summary: SummaryStatistics,
    /// The bootstrap distribution itself
    #[serde(skip)]
    pub distribution: BootstrapDistribution,
    /// Name of the interval method
    pub method: &'static str,
    /// Wall-clock time of the whole computation
    pub elapsed_ms: u64,
}

impl BootstrapResult {
    /// Interval of the coordinate with the given label
    pub fn interval(&self, label: &str) -> Option<&ConfidenceInterval> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.intervals.get(index)
    }

    /// Bootstrap standard errors, one per coordinate
    pub fn std_errors(&self) -> Vec<f64> {
        self.summary.std_devs()
    }

    /// Number of replicates behind the intervals
    pub fn replications(&self) -> usize {
        self.distribution.len()
    }
}

impl fmt::Display for BootstrapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} replicates, {} ms)",
            self.method,
            self.replications(),
            self.elapsed_ms
        )?;
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>12} {:>12}",
            "coordinate", "estimate", "std.err", "lower", "upper"
        )?;
        for ((label, ci), se) in self.labels.iter().zip(&self.intervals).zip(self.std_errors()) {
            writeln!(
                f,
                "{:<16} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                label, ci.estimate, se, ci.lower, ci.upper
            )?;
        }
        Ok(())
    }
}

/// Compute bootstrap confidence intervals for any estimator
///
/// The estimator is applied to the full dataset for the point estimates,
/// then the engine configured by `config` produces the bootstrap
/// distribution and `method` turns each coordinate into an interval at
/// `config.confidence_level`. The summary reports the tail percentiles
/// of that level.
///
/// # Errors
/// Everything [`BootstrapEngine::run`] reports, plus any error of the
/// estimator on the full dataset.
#[instrument(skip(dataset, estimator, method, config),
             fields(n = dataset.n_rows(), estimator = estimator.name(), method = method.name()))]
pub fn bootstrap_confidence_intervals<E, M>(
    dataset: &Dataset,
    estimator: &E,
    method: M,
    config: &BootstrapConfig,
) -> Result<BootstrapResult>
where
    E: Estimator + ?Sized,
    M: BootstrapMethod,
{
    let start_time = Instant::now();
    let engine = BootstrapEngine::from_config(config.clone())?;
    let level = config.level()?;
    if dataset.is_empty() {
        return Err(Error::empty_input("bootstrap"));
    }

    let estimates = estimator.estimate(dataset)?;
    if estimates.len() != estimator.dimension() {
        return Err(Error::size_mismatch(
            estimator.dimension(),
            estimates.len(),
            "full-data estimate",
        ));
    }

    let distribution = engine.run(dataset, estimator)?;
    debug!("Bootstrap completed, calculating confidence intervals");

    let (lower, upper) = level.percentile_bounds();
    let summary = summarize(&distribution, &[lower, upper])?;
    let intervals = estimates
        .iter()
        .enumerate()
        .map(|(j, &estimate)| {
            method.calculate_interval(&distribution.coordinate(j), estimate, level.value())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BootstrapResult {
        labels: distribution.labels().to_vec(),
        estimates,
        intervals,
        summary,
        distribution,
        method: method.name(),
        elapsed_ms: start_time.elapsed().as_millis() as u64,
    })
}
