//! Normal-approximation confidence intervals

use crate::{ConfidenceInterval, ConfidenceLevel};
use causal_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard-normal critical value for `confidence_level`
///
/// `z_critical(0.95)` is about 1.96.
pub fn z_critical(confidence_level: f64) -> Result<f64> {
    let level = ConfidenceLevel::try_new(confidence_level)?;
    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        Error::Computation(format!("Failed to create normal distribution: {}", e))
    })?;
    Ok(normal.inverse_cdf(1.0 - level.tail_probability()))
}

/// `point ± z * sd` with `z` the two-sided normal critical value
///
/// `sd` is usually the bootstrap standard deviation of the estimate.
///
/// # Errors
/// [`Error::InvalidInput`] if `confidence_level` is outside (0, 1) or
/// `sd` is negative or NaN.
///
/// # Example
///
/// ```rust
/// use causal_confidence::normal_interval;
///
/// let ci = normal_interval(3.42, 0.48, 0.95).unwrap();
/// assert!((ci.lower - 2.48).abs() < 0.005);
/// assert!((ci.upper - 4.36).abs() < 0.005);
/// ```
pub fn normal_interval(point: f64, sd: f64, confidence_level: f64) -> Result<ConfidenceInterval> {
    if sd.is_nan() || sd < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Standard deviation must be non-negative, got {sd}"
        )));
    }
    let margin = z_critical(confidence_level)? * sd;
    Ok(ConfidenceInterval::new(
        point - margin,
        point + margin,
        point,
        confidence_level,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_z_critical() {
        assert_relative_eq!(z_critical(0.95).unwrap(), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(z_critical(0.90).unwrap(), 1.644854, epsilon = 1e-5);
        assert_relative_eq!(z_critical(0.99).unwrap(), 2.575829, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_interval() {
        let ci = normal_interval(3.42, 0.48, 0.95).unwrap();
        assert_relative_eq!(ci.lower, 2.4792, epsilon = 1e-3);
        assert_relative_eq!(ci.upper, 4.3608, epsilon = 1e-3);
        assert_eq!(ci.estimate, 3.42);
        assert_eq!(ci.confidence_level, 0.95);
    }

    #[test]
    fn test_zero_sd_collapses() {
        let ci = normal_interval(1.5, 0.0, 0.95).unwrap();
        assert_eq!(ci.lower, 1.5);
        assert_eq!(ci.upper, 1.5);
    }

    #[test]
    fn test_confidence_levels() {
        let ci_90 = normal_interval(0.0, 1.0, 0.90).unwrap();
        let ci_95 = normal_interval(0.0, 1.0, 0.95).unwrap();
        let ci_99 = normal_interval(0.0, 1.0, 0.99).unwrap();

        assert!(ci_90.width() < ci_95.width());
        assert!(ci_95.width() < ci_99.width());
        assert_relative_eq!(-ci_95.lower, ci_95.upper);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(normal_interval(0.0, -1.0, 0.95), Err(Error::InvalidInput(_))));
        assert!(matches!(normal_interval(0.0, f64::NAN, 0.95), Err(Error::InvalidInput(_))));
        assert!(matches!(normal_interval(0.0, 1.0, 0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(normal_interval(0.0, 1.0, 1.0), Err(Error::InvalidInput(_))));
    }
}
