//! Causal-effect estimator compositions
//!
//! Each estimator combines predictions from fitted outcome and/or
//! exposure models into the same three-element vector:
//!
//! | index | label        | meaning                      |
//! |-------|--------------|------------------------------|
//! | 0     | `mean_a0`    | mean outcome under exposure 0 |
//! | 1     | `mean_a1`    | mean outcome under exposure 1 |
//! | 2     | `difference` | `mean_a1 - mean_a0`          |
//!
//! - [`GFormula`]: standardization over an outcome model
//! - [`Iptw`]: inverse probability of treatment weighting, optionally
//!   stabilized
//! - [`Aipw`]: augmented IPW, consistent if either model is correct
//!
//! All of them implement [`Estimator`](causal_core::Estimator) and can be
//! handed to the bootstrap engine directly.

mod aipw;
mod gformula;
mod iptw;
mod weights;

pub use aipw::Aipw;
pub use gformula::GFormula;
pub use iptw::Iptw;
pub use weights::WeightSummary;

use causal_core::{Dataset, EstimateVector, Error, Result};

/// Coordinate labels shared by every estimator in this crate
pub const EFFECT_LABELS: [&str; 3] = ["mean_a0", "mean_a1", "difference"];

/// Index of the effect difference in the estimate vector
pub const DIFFERENCE: usize = 2;

fn effect_vector(mean_a0: f64, mean_a1: f64) -> EstimateVector {
    vec![mean_a0, mean_a1, mean_a1 - mean_a0]
}

fn effect_labels() -> Vec<String> {
    EFFECT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Exposure column values, checked to be 0 or 1
fn exposure_values<'a>(data: &'a Dataset, exposure: &str) -> Result<&'a [f64]> {
    let a = data.numeric(exposure)?;
    if let Some(bad) = a.iter().find(|&&v| v != 0.0 && v != 1.0) {
        return Err(Error::InvalidInput(format!(
            "Exposure {exposure} must be 0 or 1, found {bad}"
        )));
    }
    Ok(a)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_vector() {
        assert_eq!(effect_vector(1.5, 4.0), vec![1.5, 4.0, 2.5]);
        assert_eq!(effect_labels(), vec!["mean_a0", "mean_a1", "difference"]);
    }

    #[test]
    fn test_exposure_must_be_binary() {
        let data = Dataset::builder()
            .numeric("a", vec![0.0, 1.0, 2.0])
            .build()
            .unwrap();
        assert!(matches!(exposure_values(&data, "a"), Err(Error::InvalidInput(_))));

        let data = Dataset::builder()
            .numeric("a", vec![0.0, f64::NAN])
            .build()
            .unwrap();
        assert!(exposure_values(&data, "a").is_err());
    }
}
