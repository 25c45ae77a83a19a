//! Inverse probability of treatment weighting

use crate::{effect_labels, effect_vector, exposure_values, WeightSummary};
use causal_core::{utils, Dataset, EstimateVector, Estimator, ModelFitter, Result};
use tracing::trace;

/// IPTW estimator
///
/// Each row is weighted by `1 / P(A = a_i | L_i)` from the propensity
/// model. With a numerator model the weights are stabilized to
/// `P(A = a_i) / P(A = a_i | L_i)`. The effect is the difference of the
/// weighted outcome means in the two exposure groups, taken over the rows
/// with an observed outcome.
///
/// Propensities of exactly 0 or 1 are not clamped; the resulting infinite
/// weights surface as non-finite estimates.
#[derive(Debug, Clone)]
pub struct Iptw<P, N = P> {
    propensity_model: P,
    numerator_model: Option<N>,
    exposure: String,
    outcome: String,
}

impl<P: ModelFitter> Iptw<P, P> {
    /// Unstabilized weights from `propensity_model`, which predicts
    /// P(exposure = 1 | covariates)
    pub fn new(propensity_model: P, exposure: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            propensity_model,
            numerator_model: None,
            exposure: exposure.into(),
            outcome: outcome.into(),
        }
    }
}

impl<P: ModelFitter, N: ModelFitter> Iptw<P, N> {
    /// Stabilize the weights with `numerator_model`, usually a marginal
    /// (intercept-only) model of the exposure
    pub fn stabilized<M: ModelFitter>(self, numerator_model: M) -> Iptw<P, M> {
        Iptw {
            propensity_model: self.propensity_model,
            numerator_model: Some(numerator_model),
            exposure: self.exposure,
            outcome: self.outcome,
        }
    }

    /// Whether weights are stabilized
    pub fn is_stabilized(&self) -> bool {
        self.numerator_model.is_some()
    }

    /// Per-row weights for `data`
    pub fn weights(&self, data: &Dataset) -> Result<Vec<f64>> {
        let a = exposure_values(data, &self.exposure)?;
        let propensity = self.propensity_model.fit_predict(data)?;
        let numerator = match &self.numerator_model {
            Some(model) => Some(model.fit_predict(data)?),
            None => None,
        };

        let weights = a
            .iter()
            .enumerate()
            .map(|(i, &ai)| {
                let denominator = probability_of_observed(ai, propensity[i]);
                let numerator = numerator
                    .as_ref()
                    .map_or(1.0, |q| probability_of_observed(ai, q[i]));
                numerator / denominator
            })
            .collect();
        Ok(weights)
    }

    /// Summary of the weights for `data`
    pub fn weight_summary(&self, data: &Dataset) -> Result<WeightSummary> {
        Ok(WeightSummary::from_weights(&self.weights(data)?))
    }
}

/// P(A = a) given P(A = 1) = p
fn probability_of_observed(a: f64, p: f64) -> f64 {
    if a == 1.0 {
        p
    } else {
        1.0 - p
    }
}

impl<P: ModelFitter, N: ModelFitter> Estimator for Iptw<P, N> {
    fn estimate(&self, data: &Dataset) -> Result<EstimateVector> {
        let weights = self.weights(data)?;
        let a = data.numeric(&self.exposure)?;
        let y = data.numeric(&self.outcome)?;

        let mut groups = [(Vec::new(), Vec::new()), (Vec::new(), Vec::new())];
        for i in (0..data.n_rows()).filter(|&i| !y[i].is_nan()) {
            let (values, group_weights) = &mut groups[usize::from(a[i] == 1.0)];
            values.push(y[i]);
            group_weights.push(weights[i]);
        }
        let mean_a0 = utils::weighted_mean(&groups[0].0, &groups[0].1);
        let mean_a1 = utils::weighted_mean(&groups[1].0, &groups[1].1);
        trace!(mean_a0, mean_a1, stabilized = self.is_stabilized(), "iptw estimate");
        Ok(effect_vector(mean_a0, mean_a1))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        if self.is_stabilized() {
            "stabilized iptw"
        } else {
            "iptw"
        }
    }

    fn labels(&self) -> Vec<String> {
        effect_labels()
    }
}
