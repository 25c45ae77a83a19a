//! Bootstrap confidence intervals for causal-effect estimators
//!
//! G-formula, IPTW and AIPW estimates have no convenient closed-form
//! standard error. This crate resamples dataset rows with replacement,
//! re-runs the estimator on every replicate and turns the resulting
//! distribution into standard errors and confidence intervals:
//!
//! - [`BootstrapEngine`]: seeded, reproducible row resampling with an
//!   explicit [`FailurePolicy`] for replicates the estimator cannot handle
//! - [`summarize`]: per-coordinate mean, SD and type-7 percentiles
//! - [`normal_interval`]: `point ± z * sd`
//! - [`PercentileBootstrap`], [`NormalBootstrap`], [`BasicBootstrap`]:
//!   interval methods
//! - [`bootstrap_confidence_intervals`]: all of the above in one call
//!
//! # Example
//!
//! ```rust
//! use causal_confidence::{bootstrap_confidence_intervals, BootstrapConfig, PercentileBootstrap};
//! use causal_core::{estimator_fn, utils, Dataset};
//!
//! let data = Dataset::builder()
//!     .numeric("y", vec![3.1, 4.7, 2.2, 5.9, 4.4, 3.8, 6.1, 2.9])
//!     .build()
//!     .unwrap();
//! let mean_y = estimator_fn("mean_y", 1, |d: &Dataset| Ok(vec![utils::mean(d.numeric("y")?)]));
//!
//! let config = BootstrapConfig { replications: 500, seed: 1, ..Default::default() };
//! let result = bootstrap_confidence_intervals(&data, &mean_y, PercentileBootstrap, &config).unwrap();
//! let ci = &result.intervals[0];
//! assert!(ci.lower < result.estimates[0] && result.estimates[0] < ci.upper);
//! ```
//!
//! # Features
//!
//! - `parallel`: compute replicates on the rayon pool when the
//!   configuration asks for [`ExecutionStrategy::Parallel`] with
//!   [`ResampleStream::PerReplicate`]

pub mod api;
mod asymptotic;
mod bootstrap;
mod bootstrap_methods;
pub mod config;
mod summary;
mod types;

// Re-exports
pub use api::{bootstrap_confidence_intervals, run, BootstrapResult};
pub use asymptotic::{normal_interval, z_critical};
pub use bootstrap::BootstrapEngine;
pub use bootstrap_methods::{
    BasicBootstrap, BootstrapMethod, IntervalMethod, NormalBootstrap, PercentileBootstrap,
};
pub use config::{
    BootstrapConfig, ExecutionStrategy, FailurePolicy, ResampleStream, DEFAULT_REPLICATIONS,
    DEFAULT_SEED, FAST_REPLICATIONS, HIGH_PRECISION_REPLICATIONS,
};
pub use summary::{summarize, BootstrapDistribution, CoordinateSummary, SummaryStatistics};
pub use types::{ConfidenceInterval, ConfidenceLevel};
