//! Augmented inverse probability weighting (doubly robust)

use crate::{effect_labels, effect_vector, exposure_values};
use causal_core::{utils, Dataset, EstimateVector, Estimator, FittedModel, ModelFitter, Result};
use tracing::trace;

/// AIPW estimator
///
/// Combines an outcome model `m_a(L)` and a propensity model `e(L)`:
///
/// ```text
/// mean_a1 = mean( m1 + A (Y - m1) / e )
/// mean_a0 = mean( m0 + (1 - A) (Y - m0) / (1 - e) )
/// ```
///
/// over the rows with an observed outcome. The estimate is consistent if
/// either model is correctly specified.
#[derive(Debug, Clone)]
pub struct Aipw<O, P> {
    outcome_model: O,
    propensity_model: P,
    exposure: String,
    outcome: String,
}

impl<O: ModelFitter, P: ModelFitter> Aipw<O, P> {
    /// `outcome_model` must include the exposure among its covariates;
    /// `propensity_model` predicts P(exposure = 1 | covariates)
    pub fn new(
        outcome_model: O,
        propensity_model: P,
        exposure: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            outcome_model,
            propensity_model,
            exposure: exposure.into(),
            outcome: outcome.into(),
        }
    }
}

impl<O: ModelFitter, P: ModelFitter> Estimator for Aipw<O, P> {
    fn estimate(&self, data: &Dataset) -> Result<EstimateVector> {
        let a = exposure_values(data, &self.exposure)?;
        let y = data.numeric(&self.outcome)?;

        let outcome_fit = self.outcome_model.fit(data)?;
        let m0 = outcome_fit.predict(&data.with_constant(&self.exposure, 0.0)?)?;
        let m1 = outcome_fit.predict(&data.with_constant(&self.exposure, 1.0)?)?;
        let e = self.propensity_model.fit_predict(data)?;

        let (mut psi0, mut psi1) = (Vec::new(), Vec::new());
        for i in (0..data.n_rows()).filter(|&i| !y[i].is_nan()) {
            if a[i] == 1.0 {
                psi1.push(m1[i] + (y[i] - m1[i]) / e[i]);
                psi0.push(m0[i]);
            } else {
                psi1.push(m1[i]);
                psi0.push(m0[i] + (y[i] - m0[i]) / (1.0 - e[i]));
            }
        }

        let (mean_a0, mean_a1) = (utils::mean(&psi0), utils::mean(&psi1));
        trace!(mean_a0, mean_a1, "aipw estimate");
        Ok(effect_vector(mean_a0, mean_a1))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        "aipw"
    }

    fn labels(&self) -> Vec<String> {
        effect_labels()
    }
}
