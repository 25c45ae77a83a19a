//! Bootstrap confidence intervals for causal-effect estimators
//!
//! Umbrella crate over the workspace:
//!
//! - [`causal_core`]: datasets, the estimator and model traits, errors
//! - [`glm`]: Gaussian and logistic regression for outcome and
//!   propensity models
//! - [`estimators`]: G-formula, IPTW and AIPW
//! - [`confidence`]: the bootstrap engine, summaries and intervals
//!
//! # Example
//!
//! ```rust
//! use causal_stats::prelude::*;
//!
//! let data = Dataset::builder()
//!     .numeric("l", vec![0.1, 0.4, -0.3, 1.2, 0.8, -1.1, 0.0, 0.6, -0.5, 1.5])
//!     .numeric("a", vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0])
//!     .numeric("y", vec![1.2, 3.5, 0.4, 5.1, 4.0, -0.6, 1.1, 4.2, 0.2, 5.9])
//!     .build()
//!     .unwrap();
//!
//! let outcome = Glm::new(ModelSpec::new("y", Family::Gaussian).linear("a").linear("l"));
//! let gformula = GFormula::new(outcome, "a");
//!
//! // Tiny samples sometimes resample a single exposure group
//! let config = BootstrapConfig {
//!     replications: 200,
//!     failure_policy: FailurePolicy::Redraw { max_redraws: 100 },
//!     ..Default::default()
//! };
//! let result = bootstrap_confidence_intervals(&data, &gformula, PercentileBootstrap, &config).unwrap();
//! assert_eq!(result.labels, EFFECT_LABELS);
//! println!("{result}");
//! ```

pub use causal_confidence as confidence;
pub use causal_core;
pub use causal_estimators as estimators;
pub use causal_glm as glm;

pub use causal_confidence::{
    bootstrap_confidence_intervals, normal_interval, run, summarize, BootstrapConfig,
    BootstrapDistribution, BootstrapEngine, BootstrapResult, ConfidenceInterval, FailurePolicy,
    SummaryStatistics,
};
pub use causal_core::{Dataset, Error, Estimator, Result};

/// Everything needed for a typical analysis
pub mod prelude {
    pub use causal_confidence::{
        bootstrap_confidence_intervals, normal_interval, run, summarize, BasicBootstrap,
        BootstrapConfig, BootstrapDistribution, BootstrapEngine, BootstrapMethod,
        BootstrapResult, ConfidenceInterval, ConfidenceLevel, ExecutionStrategy, FailurePolicy,
        IntervalMethod, NormalBootstrap, PercentileBootstrap, ResampleStream, SummaryStatistics,
        DEFAULT_REPLICATIONS, FAST_REPLICATIONS, HIGH_PRECISION_REPLICATIONS,
    };
    pub use causal_core::{
        estimator_fn, utils, Column, Dataset, EstimateVector, Error, Estimator, FittedModel,
        ModelFitter, Result,
    };
    pub use causal_estimators::{Aipw, GFormula, Iptw, WeightSummary, DIFFERENCE, EFFECT_LABELS};
    pub use causal_glm::{Family, Glm, GlmFit, ModelSpec, Term};
}
