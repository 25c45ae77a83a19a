//! Standardization (parametric G-formula)

use crate::{effect_labels, effect_vector, exposure_values};
use causal_core::{utils, Dataset, EstimateVector, Estimator, FittedModel, ModelFitter, Result};
use tracing::trace;

/// G-formula estimator over an outcome model
///
/// Fits the outcome model on the rows with an observed outcome, then
/// predicts every row twice: once with the exposure forced to 0 and once
/// forced to 1. The two prediction means are the standardized outcome
/// means.
#[derive(Debug, Clone)]
pub struct GFormula<O> {
    outcome_model: O,
    exposure: String,
}

impl<O: ModelFitter> GFormula<O> {
    /// `outcome_model` must include the exposure among its covariates
    pub fn new(outcome_model: O, exposure: impl Into<String>) -> Self {
        Self {
            outcome_model,
            exposure: exposure.into(),
        }
    }

    /// Counterfactual predictions for every row: (exposure = 0, exposure = 1)
    pub fn counterfactual_predictions(&self, data: &Dataset) -> Result<(Vec<f64>, Vec<f64>)> {
        exposure_values(data, &self.exposure)?;
        let fit = self.outcome_model.fit(data)?;
        let untreated = fit.predict(&data.with_constant(&self.exposure, 0.0)?)?;
        let treated = fit.predict(&data.with_constant(&self.exposure, 1.0)?)?;
        Ok((untreated, treated))
    }
}

impl<O: ModelFitter> Estimator for GFormula<O> {
    fn estimate(&self, data: &Dataset) -> Result<EstimateVector> {
        let (untreated, treated) = self.counterfactual_predictions(data)?;
        let (mean_a0, mean_a1) = (utils::mean(&untreated), utils::mean(&treated));
        trace!(mean_a0, mean_a1, "g-formula estimate");
        Ok(effect_vector(mean_a0, mean_a1))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        "g-formula"
    }

    fn labels(&self) -> Vec<String> {
        effect_labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{confounded, TRUE_EFFECT};
    use crate::DIFFERENCE;
    use approx::assert_relative_eq;
    use causal_core::Error;
    use causal_glm::{Family, Glm, ModelSpec};

    #[test]
    fn test_recovers_effect_with_adjustment() {
        let data = confounded(4000, 11);
        let model = Glm::new(ModelSpec::new("y", Family::Gaussian).linear("a").linear("l"));
        let est = GFormula::new(model, "a").estimate(&data).unwrap();

        assert_eq!(est.len(), 3);
        assert_relative_eq!(est[DIFFERENCE], TRUE_EFFECT, epsilon = 0.1);
        assert_relative_eq!(est[DIFFERENCE], est[1] - est[0]);
    }

    #[test]
    fn test_unadjusted_model_is_biased() {
        let data = confounded(4000, 11);
        let model = Glm::new(ModelSpec::new("y", Family::Gaussian).linear("a"));
        let est = GFormula::new(model, "a").estimate(&data).unwrap();
        assert!(est[DIFFERENCE] > TRUE_EFFECT + 0.5);
    }

    #[test]
    fn test_missing_outcomes_are_standardized_over() {
        // Rows with missing y still contribute counterfactual predictions
        let data = causal_core::Dataset::builder()
            .numeric("y", vec![1.0, 3.0, 2.0, 4.0, f64::NAN])
            .numeric("a", vec![0.0, 1.0, 0.0, 1.0, 1.0])
            .build()
            .unwrap();
        let model = Glm::new(ModelSpec::new("y", Family::Gaussian).linear("a"));
        let est = GFormula::new(model, "a").estimate(&data).unwrap();
        assert_relative_eq!(est[0], 1.5, epsilon = 1e-10);
        assert_relative_eq!(est[1], 3.5, epsilon = 1e-10);
        assert_relative_eq!(est[2], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_metadata() {
        let est = GFormula::new(Glm::linear("y", Vec::new()), "a");
        assert_eq!(est.dimension(), 3);
        assert_eq!(est.name(), "g-formula");
        assert_eq!(est.labels(), vec!["mean_a0", "mean_a1", "difference"]);
    }

    #[test]
    fn test_missing_exposure_column() {
        let data = confounded(50, 1);
        let est = GFormula::new(Glm::linear("y", Vec::new()), "qsmk");
        assert!(matches!(est.estimate(&data), Err(Error::ColumnNotFound(_))));
    }
}
