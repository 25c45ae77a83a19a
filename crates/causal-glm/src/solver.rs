//! Iteratively reweighted least squares

use crate::Family;
use causal_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Probabilities are kept this far from 0 and 1 when forming working
/// weights and responses.
const MU_EPS: f64 = 1e-10;

/// A Cholesky pivot below this fraction of its diagonal entry marks the
/// column as linearly dependent on the ones before it.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// IRLS controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrlsConfig {
    pub max_iterations: usize,
    /// Relative deviance change below which the fit has converged
    pub tolerance: f64,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: 1e-8,
        }
    }
}

/// Raw IRLS output
#[derive(Debug, Clone)]
pub struct IrlsResult {
    pub coefficients: DVector<f64>,
    pub deviance: f64,
    pub iterations: usize,
}

/// Fit `family` to response `y` with design `x`
///
/// Fails with [`Error::ModelFit`] when the weighted cross-product matrix
/// is not positive definite (rank-deficient design, e.g. an indicator
/// column that is all zero in a resample) or when the deviance does not
/// settle within `max_iterations`.
pub fn fit_irls(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    family: Family,
    config: &IrlsConfig,
) -> Result<IrlsResult> {
    let (n, p) = x.shape();
    if n < p {
        return Err(Error::InsufficientData {
            expected: p,
            actual: n,
        });
    }

    // Start from the data, as glm() does: mu = (y + 0.5) / 2 for binomial
    let mut mu: DVector<f64> = match family {
        Family::Gaussian => y.clone(),
        Family::Binomial => y.map(|v| (v + 0.5) / 2.0),
    };
    let mut eta = mu.map(|m| family.link(m));
    let mut deviance = family.deviance(y.as_slice(), mu.as_slice());

    for iteration in 1..=config.max_iterations {
        let (w, z) = working_values(family, y, &mu, &eta);
        let coefficients = weighted_least_squares(x, &w, &z)?;

        eta = x * &coefficients;
        mu = eta.map(|e| family.inverse_link(e));
        let new_deviance = family.deviance(y.as_slice(), mu.as_slice());
        trace!(iteration, deviance = new_deviance, "IRLS step");

        let change = (new_deviance - deviance).abs() / (new_deviance.abs() + 0.1);
        deviance = new_deviance;
        if family.is_linear() || change < config.tolerance {
            return Ok(IrlsResult {
                coefficients,
                deviance,
                iterations: iteration,
            });
        }
    }

    Err(Error::ModelFit(format!(
        "IRLS did not converge in {} iterations",
        config.max_iterations
    )))
}

/// Working weights and working response for the current fit
fn working_values(
    family: Family,
    y: &DVector<f64>,
    mu: &DVector<f64>,
    eta: &DVector<f64>,
) -> (DVector<f64>, DVector<f64>) {
    match family {
        Family::Gaussian => (DVector::from_element(y.len(), 1.0), y.clone()),
        Family::Binomial => {
            // Canonical link: dmu/deta = V(mu)
            let v = mu.map(|m| family.variance(m.clamp(MU_EPS, 1.0 - MU_EPS)));
            let z = DVector::from_fn(y.len(), |i, _| eta[i] + (y[i] - mu[i]) / v[i]);
            (v, z)
        }
    }
}

/// Solve `(X' W X) b = X' W z` by Cholesky decomposition
fn weighted_least_squares(
    x: &DMatrix<f64>,
    w: &DVector<f64>,
    z: &DVector<f64>,
) -> Result<DVector<f64>> {
    let xw = DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] * w[i]);
    let xtwx = x.transpose() * &xw;
    let xtwz = xw.transpose() * z;
    let diagonal = xtwx.diagonal();
    let singular =
        || Error::ModelFit("singular design matrix (X'WX is not positive definite)".to_string());
    let chol = xtwx.cholesky().ok_or_else(singular)?;
    let l = chol.l_dirty();
    for j in 0..diagonal.len() {
        if !(l[(j, j)] * l[(j, j)] > PIVOT_TOLERANCE * diagonal[j]) {
            return Err(singular());
        }
    }
    Ok(chol.solve(&xtwz))
}
