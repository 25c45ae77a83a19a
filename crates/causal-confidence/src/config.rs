//! Bootstrap run configuration

use crate::ConfidenceLevel;
use causal_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of bootstrap replications
pub const DEFAULT_REPLICATIONS: usize = 1000;

/// Replication count for quick looks
pub const FAST_REPLICATIONS: usize = 250;

/// Replication count for publication-grade intervals
pub const HIGH_PRECISION_REPLICATIONS: usize = 5000;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// What to do when the estimator fails on a replicate
///
/// Failures typically come from degenerate resamples: a covariate level
/// missing from the resample makes the design singular, or a logistic
/// model separates perfectly. Dropping such replicates silently would
/// bias the distribution, so the policy has to be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole run on the first failing replicate
    #[default]
    Abort,
    /// Discard the failing resample and draw a fresh one from the same
    /// stream, up to `max_redraws` times over the whole run
    Redraw { max_redraws: usize },
}

impl FailurePolicy {
    /// Number of failed resamples the run may redraw
    pub fn redraw_budget(&self) -> usize {
        match self {
            Self::Abort => 0,
            Self::Redraw { max_redraws } => *max_redraws,
        }
    }
}

/// How resampling indices are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleStream {
    /// One generator seeded once; replicates draw from it in order
    #[default]
    Shared,
    /// Replicate `i` draws from its own sub-stream `i` of the seeded
    /// generator, so replicates can be computed in any order
    PerReplicate,
}

/// Execution strategy for the replicate loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Process replicates in order on the calling thread
    #[default]
    Sequential,
    /// Process replicates on the rayon pool (requires
    /// [`ResampleStream::PerReplicate`])
    Parallel,
}

/// Full configuration of a bootstrap run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub replications: usize,
    pub seed: u64,
    pub confidence_level: f64,
    pub failure_policy: FailurePolicy,
    pub stream: ResampleStream,
    pub execution: ExecutionStrategy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            replications: DEFAULT_REPLICATIONS,
            seed: DEFAULT_SEED,
            confidence_level: 0.95,
            failure_policy: FailurePolicy::Abort,
            stream: ResampleStream::Shared,
            execution: ExecutionStrategy::Sequential,
        }
    }
}

impl BootstrapConfig {
    /// Parse a configuration from JSON; missing fields take defaults
    ///
    /// ```rust
    /// use causal_confidence::{BootstrapConfig, FailurePolicy};
    ///
    /// let config = BootstrapConfig::from_json(
    ///     r#"{"replications": 500, "seed": 7, "failure_policy": {"policy": "redraw", "max_redraws": 20}}"#,
    /// ).unwrap();
    /// assert_eq!(config.replications, 500);
    /// assert_eq!(config.failure_policy, FailurePolicy::Redraw { max_redraws: 20 });
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("Invalid bootstrap config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.into()))
    }

    /// Check the configuration for values that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.replications == 0 {
            return Err(Error::InvalidInput(
                "Number of replications must be positive".to_string(),
            ));
        }
        ConfidenceLevel::try_new(self.confidence_level)?;
        if self.execution == ExecutionStrategy::Parallel && self.stream == ResampleStream::Shared {
            return Err(Error::InvalidInput(
                "Parallel execution requires per-replicate resampling streams".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured confidence level
    pub fn level(&self) -> Result<ConfidenceLevel> {
        ConfidenceLevel::try_new(self.confidence_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.replications, DEFAULT_REPLICATIONS);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.stream, ResampleStream::Shared);
        assert_eq!(config.execution, ExecutionStrategy::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = BootstrapConfig {
            replications: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));

        let config = BootstrapConfig {
            confidence_level: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BootstrapConfig {
            execution: ExecutionStrategy::Parallel,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BootstrapConfig {
            execution: ExecutionStrategy::Parallel,
            stream: ResampleStream::PerReplicate,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = BootstrapConfig {
            replications: 250,
            seed: 9,
            failure_policy: FailurePolicy::Redraw { max_redraws: 5 },
            stream: ResampleStream::PerReplicate,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"per_replicate\""));
        assert_eq!(BootstrapConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_defaults_and_errors() {
        let config = BootstrapConfig::from_json("{}").unwrap();
        assert_eq!(config, BootstrapConfig::default());

        assert!(BootstrapConfig::from_json(r#"{"replications": 0}"#).is_err());
        assert!(BootstrapConfig::from_json("not json").is_err());
    }
}
