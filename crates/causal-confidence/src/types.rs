//! Common types for confidence intervals

use causal_core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A confidence interval with lower and upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
    /// The point estimate
    pub estimate: f64,
    /// Confidence level (e.g., 0.95 for 95% CI)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Create a new confidence interval
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.4}, {:.4}], estimate: {:.4}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.estimate
        )
    }
}

/// Confidence level type with validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Create a confidence level, rejecting values outside (0, 1)
    pub fn try_new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::InvalidInput(format!(
                "Confidence level {level} must be in (0, 1)"
            )))
        }
    }

    /// Get the confidence level value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the alpha level (1 - confidence level)
    pub fn alpha(&self) -> f64 {
        1.0 - self.0
    }

    /// Get the tail probability (alpha/2 for two-tailed)
    pub fn tail_probability(&self) -> f64 {
        self.alpha() / 2.0
    }

    /// Lower and upper tail percentiles on the 0-100 scale
    pub fn percentile_bounds(&self) -> (f64, f64) {
        let tail = self.tail_probability() * 100.0;
        (tail, 100.0 - tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_confidence_interval() {
        let ci = ConfidenceInterval::new(2.0, 8.0, 5.0, 0.95);

        assert_eq!(ci.width(), 6.0);
        assert!(ci.contains(5.0));
        assert!(!ci.contains(1.0));
        assert!(!ci.contains(9.0));
    }

    #[test]
    fn test_confidence_level() {
        let level = ConfidenceLevel::try_new(0.95).unwrap();
        assert_eq!(level.value(), 0.95);
        assert_relative_eq!(level.alpha(), 0.05, epsilon = 1e-10);
        assert_relative_eq!(level.tail_probability(), 0.025, epsilon = 1e-10);

        let (lo, hi) = level.percentile_bounds();
        assert_relative_eq!(lo, 2.5, epsilon = 1e-10);
        assert_relative_eq!(hi, 97.5, epsilon = 1e-10);
    }

    #[test]
    fn test_try_new() {
        assert!(ConfidenceLevel::try_new(0.9).is_ok());
        assert!(matches!(ConfidenceLevel::try_new(0.0), Err(Error::InvalidInput(_))));
        assert!(ConfidenceLevel::try_new(1.5).is_err());
        assert!(ConfidenceLevel::try_new(f64::NAN).is_err());
    }

    #[test]
    fn test_confidence_interval_display() {
        let ci = ConfidenceInterval::new(2.5, 7.5, 5.0, 0.95);
        assert_eq!(
            format!("{}", ci),
            "95.0% CI: [2.5000, 7.5000], estimate: 5.0000"
        );
    }
}
