//! Response distribution families and their canonical links

use causal_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Distribution family of the response
///
/// Each family uses its canonical link: identity for Gaussian, logit for
/// Binomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Continuous outcome, identity link
    Gaussian,
    /// Binary outcome or exposure, logit link
    Binomial,
}

impl Family {
    /// Link function g(mu)
    pub fn link(&self, mu: f64) -> f64 {
        match self {
            Self::Gaussian => mu,
            Self::Binomial => (mu / (1.0 - mu)).ln(),
        }
    }

    /// Inverse link g^-1(eta)
    pub fn inverse_link(&self, eta: f64) -> f64 {
        match self {
            Self::Gaussian => eta,
            Self::Binomial => {
                // Split on sign so exp never overflows
                if eta >= 0.0 {
                    1.0 / (1.0 + (-eta).exp())
                } else {
                    let e = eta.exp();
                    e / (1.0 + e)
                }
            }
        }
    }

    /// Variance function V(mu)
    pub fn variance(&self, mu: f64) -> f64 {
        match self {
            Self::Gaussian => 1.0,
            Self::Binomial => mu * (1.0 - mu),
        }
    }

    /// Total deviance of fitted means against observed responses
    pub fn deviance(&self, y: &[f64], mu: &[f64]) -> f64 {
        match self {
            Self::Gaussian => y.iter().zip(mu).map(|(&y, &m)| (y - m) * (y - m)).sum(),
            Self::Binomial => {
                2.0 * y
                    .iter()
                    .zip(mu)
                    .map(|(&y, &m)| xlogy(y, y / m) + xlogy(1.0 - y, (1.0 - y) / (1.0 - m)))
                    .sum::<f64>()
            }
        }
    }

    /// Check that every response value is admissible for the family
    pub fn validate_response(&self, y: &[f64]) -> Result<()> {
        match self {
            Self::Gaussian => {
                if y.iter().any(|v| !v.is_finite()) {
                    return Err(Error::InvalidInput(
                        "Gaussian response contains non-finite values".to_string(),
                    ));
                }
            }
            Self::Binomial => {
                if let Some(bad) = y.iter().find(|&&v| !(0.0..=1.0).contains(&v)) {
                    return Err(Error::InvalidInput(format!(
                        "Binomial response must be in [0, 1], found {bad}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether IRLS converges in one weighted least squares step
    pub(crate) fn is_linear(&self) -> bool {
        matches!(self, Self::Gaussian)
    }
}

/// `x * ln(z)` with the convention `0 * ln(0) = 0`
fn xlogy(x: f64, z: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * z.ln()
    }
}
