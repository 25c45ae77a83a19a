//! Bootstrap distributions and their summaries

use causal_core::{utils, EstimateVector, Error, Result};
use serde::Serialize;
use std::fmt;

/// Estimate vectors from every replicate of one bootstrap run
///
/// The length always equals the configured replication count and the
/// order is the replicate generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDistribution {
    replicates: Vec<EstimateVector>,
    dimension: usize,
    labels: Vec<String>,
    seed: Option<u64>,
    redraws: usize,
}

impl BootstrapDistribution {
    pub(crate) fn from_run(
        replicates: Vec<EstimateVector>,
        labels: Vec<String>,
        seed: u64,
        redraws: usize,
    ) -> Self {
        Self {
            dimension: labels.len(),
            replicates,
            labels,
            seed: Some(seed),
            redraws,
        }
    }

    /// Wrap externally produced replicate estimates
    ///
    /// Every vector must have the same length. An empty collection is
    /// accepted (it cannot be summarized).
    pub fn from_replicates(replicates: Vec<EstimateVector>) -> Result<Self> {
        let dimension = replicates.first().map_or(0, Vec::len);
        if let Some(bad) = replicates.iter().find(|r| r.len() != dimension) {
            return Err(Error::size_mismatch(dimension, bad.len(), "bootstrap replicate"));
        }
        Ok(Self {
            replicates,
            dimension,
            labels: (0..dimension).map(|i| format!("estimate_{i}")).collect(),
            seed: None,
            redraws: 0,
        })
    }

    /// Wrap scalar replicate estimates
    pub fn from_scalars(values: &[f64]) -> Self {
        Self {
            replicates: values.iter().map(|&v| vec![v]).collect(),
            dimension: 1,
            labels: vec!["estimate_0".to_string()],
            seed: None,
            redraws: 0,
        }
    }

    /// Number of replicates
    pub fn len(&self) -> usize {
        self.replicates.len()
    }

    /// Whether there are no replicates
    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    /// Dimension of every estimate vector
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinate labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Seed of the run that produced this distribution
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Resamples discarded and redrawn because the estimator failed
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// All replicate estimates in generation order
    pub fn replicates(&self) -> &[EstimateVector] {
        &self.replicates
    }

    /// Values of one coordinate across replicates
    ///
    /// # Panics
    /// Panics if `index >= self.dimension()`.
    pub fn coordinate(&self, index: usize) -> Vec<f64> {
        assert!(index < self.dimension, "coordinate {index} out of range");
        self.replicates.iter().map(|r| r[index]).collect()
    }

    /// Summarize every coordinate, see [`summarize`]
    pub fn summarize(&self, percentiles: &[f64]) -> Result<SummaryStatistics> {
        summarize(self, percentiles)
    }
}

/// Summary of one coordinate of the bootstrap distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateSummary {
    pub label: String,
    pub mean: f64,
    /// Sample standard deviation (n - 1), the bootstrap standard error
    pub std_dev: f64,
    /// One value per requested percentile, in request order
    pub percentiles: Vec<f64>,
}

/// Per-coordinate mean, standard deviation and percentiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub replications: usize,
    /// Requested percentiles on the 0-100 scale
    pub percentiles: Vec<f64>,
    pub coordinates: Vec<CoordinateSummary>,
}

impl SummaryStatistics {
    /// Means, one per coordinate
    pub fn means(&self) -> Vec<f64> {
        self.coordinates.iter().map(|c| c.mean).collect()
    }

    /// Standard deviations, one per coordinate
    pub fn std_devs(&self) -> Vec<f64> {
        self.coordinates.iter().map(|c| c.std_dev).collect()
    }

    /// Value of requested percentile `p` for coordinate `index`
    ///
    /// `None` if the coordinate does not exist or `p` was not requested.
    pub fn percentile(&self, index: usize, p: f64) -> Option<f64> {
        let position = self.percentiles.iter().position(|&q| q == p)?;
        self.coordinates.get(index).map(|c| c.percentiles[position])
    }

    /// Summary of the coordinate with the given label
    pub fn by_label(&self, label: &str) -> Option<&CoordinateSummary> {
        self.coordinates.iter().find(|c| c.label == label)
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:>12} {:>12}", "coordinate", "mean", "sd")?;
        for p in &self.percentiles {
            write!(f, " {:>11}%", p)?;
        }
        writeln!(f)?;
        for c in &self.coordinates {
            write!(f, "{:<16} {:>12.4} {:>12.4}", c.label, c.mean, c.std_dev)?;
            for v in &c.percentiles {
                write!(f, " {:>12.4}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Summarize a bootstrap distribution
///
/// For each coordinate independently: arithmetic mean, sample standard
/// deviation (n - 1 denominator), and each requested percentile (0-100
/// scale) by type-7 linear interpolation between order statistics.
/// NaN replicate values sort last and propagate into the mean and
/// standard deviation. Infinite replicates propagate as well: the mean
/// becomes infinite, the standard deviation NaN, and percentiles that
/// interpolate toward them are infinite.
///
/// # Errors
/// [`Error::InvalidInput`] if the distribution is empty or a percentile
/// is outside [0, 100].
///
/// # Example
///
/// ```rust
/// use causal_confidence::{summarize, BootstrapDistribution};
///
/// let values: Vec<f64> = (1..=10).map(f64::from).collect();
/// let dist = BootstrapDistribution::from_scalars(&values);
/// let summary = summarize(&dist, &[2.5, 97.5]).unwrap();
/// assert!((summary.percentile(0, 2.5).unwrap() - 1.225).abs() < 1e-12);
/// assert!((summary.percentile(0, 97.5).unwrap() - 9.775).abs() < 1e-12);
/// ```
pub fn summarize(distribution: &BootstrapDistribution, percentiles: &[f64]) -> Result<SummaryStatistics> {
    if distribution.is_empty() {
        return Err(Error::empty_input("summarize"));
    }
    if let Some(&bad) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(Error::invalid_percentile(bad));
    }

    let coordinates = (0..distribution.dimension())
        .map(|j| {
            let values = distribution.coordinate(j);
            let sorted = utils::sorted(&values);
            CoordinateSummary {
                label: distribution.labels()[j].clone(),
                mean: utils::mean(&values),
                std_dev: utils::std_dev(&values),
                percentiles: percentiles
                    .iter()
                    .map(|&p| utils::quantile_sorted(&sorted, p / 100.0))
                    .collect(),
            }
        })
        .collect();

    Ok(SummaryStatistics {
        replications: distribution.len(),
        percentiles: percentiles.to_vec(),
        coordinates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_type7_percentiles() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let summary = summarize(&BootstrapDistribution::from_scalars(&values), &[2.5, 50.0, 97.5]).unwrap();

        assert_relative_eq!(summary.percentile(0, 2.5).unwrap(), 1.225, epsilon = 1e-12);
        assert_relative_eq!(summary.percentile(0, 50.0).unwrap(), 5.5, epsilon = 1e-12);
        assert_relative_eq!(summary.percentile(0, 97.5).unwrap(), 9.775, epsilon = 1e-12);
        assert_relative_eq!(summary.coordinates[0].mean, 5.5);
        assert_relative_eq!(summary.coordinates[0].std_dev, 3.0276503540974917, epsilon = 1e-12);
    }

    #[test]
    fn test_order_invariance() {
        let values = [7.0, 1.0, 9.0, 3.0, 3.0, 10.0];
        let mut reversed = values;
        reversed.reverse();
        let a = summarize(&BootstrapDistribution::from_scalars(&values), &[10.0, 90.0]).unwrap();
        let b = summarize(&BootstrapDistribution::from_scalars(&reversed), &[10.0, 90.0]).unwrap();
        assert_eq!(a.percentiles, b.percentiles);
        assert_eq!(a.coordinates[0].percentiles, b.coordinates[0].percentiles);
        assert_relative_eq!(a.coordinates[0].mean, b.coordinates[0].mean, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_vectors() {
        let dist = BootstrapDistribution::from_replicates(vec![vec![5.0, 5.0]; 20]).unwrap();
        let summary = dist.summarize(&[0.0, 2.5, 97.5, 100.0]).unwrap();

        assert_eq!(summary.means(), vec![5.0, 5.0]);
        assert_eq!(summary.std_devs(), vec![0.0, 0.0]);
        for c in &summary.coordinates {
            assert!(c.percentiles.iter().all(|&p| p == 5.0));
        }
    }

    #[test]
    fn test_coordinates_are_independent() {
        let dist = BootstrapDistribution::from_replicates(vec![
            vec![1.0, 30.0],
            vec![2.0, 10.0],
            vec![3.0, 20.0],
        ])
        .unwrap();
        let summary = dist.summarize(&[0.0, 100.0]).unwrap();
        assert_eq!(summary.coordinates[0].percentiles, vec![1.0, 3.0]);
        assert_eq!(summary.coordinates[1].percentiles, vec![10.0, 30.0]);
        assert_eq!(summary.by_label("estimate_1").unwrap().mean, 20.0);
    }

    #[test]
    fn test_single_replicate() {
        let summary = BootstrapDistribution::from_scalars(&[4.2]).summarize(&[2.5]).unwrap();
        assert_eq!(summary.coordinates[0].std_dev, 0.0);
        assert_eq!(summary.percentile(0, 2.5), Some(4.2));
    }

    #[test]
    fn test_invalid_inputs() {
        let empty = BootstrapDistribution::from_replicates(Vec::new()).unwrap();
        assert!(matches!(empty.summarize(&[2.5]), Err(Error::InvalidInput(_))));

        let dist = BootstrapDistribution::from_scalars(&[1.0, 2.0]);
        assert!(matches!(dist.summarize(&[-0.1]), Err(Error::InvalidInput(_))));
        assert!(matches!(dist.summarize(&[100.5]), Err(Error::InvalidInput(_))));
        assert!(dist.summarize(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_ragged_replicates_rejected() {
        let err = BootstrapDistribution::from_replicates(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_nan_propagates() {
        let dist = BootstrapDistribution::from_scalars(&[1.0, f64::NAN, 3.0]);
        let summary = dist.summarize(&[0.0]).unwrap();
        assert!(summary.coordinates[0].mean.is_nan());
        assert!(summary.coordinates[0].std_dev.is_nan());
        assert_eq!(summary.percentile(0, 0.0), Some(1.0));
    }

    #[test]
    fn test_infinite_replicate_propagates() {
        let a = BootstrapDistribution::from_scalars(&[f64::INFINITY, 1.0, 2.0]).summarize(&[0.0, 75.0]).unwrap();
        let b = BootstrapDistribution::from_scalars(&[1.0, 2.0, f64::INFINITY]).summarize(&[0.0, 75.0]).unwrap();

        for summary in [&a, &b] {
            let c = &summary.coordinates[0];
            assert_eq!(c.mean, f64::INFINITY);
            assert!(c.std_dev.is_nan());
            assert_eq!(c.percentiles, vec![1.0, f64::INFINITY]);
        }
    }

    #[test]
    fn test_negative_infinity_in_lower_tail() {
        let summary = BootstrapDistribution::from_scalars(&[3.0, f64::NEG_INFINITY, 1.0, 2.0])
            .summarize(&[2.5, 50.0])
            .unwrap();
        assert_eq!(summary.coordinates[0].mean, f64::NEG_INFINITY);
        assert_eq!(summary.percentile(0, 2.5), Some(f64::NEG_INFINITY));
        assert_relative_eq!(summary.percentile(0, 50.0).unwrap(), 1.5);
    }

    #[test]
    fn test_display() {
        let summary = BootstrapDistribution::from_scalars(&[1.0, 2.0, 3.0])
            .summarize(&[50.0])
            .unwrap();
        let text = summary.to_string();
        assert!(text.contains("estimate_0"));
        assert!(text.contains("2.0000"));
    }
}
