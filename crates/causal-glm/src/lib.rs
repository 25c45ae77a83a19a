//! Generalized linear models for outcome and propensity modeling
//!
//! This crate is the concrete collaborator behind the
//! [`ModelFitter`](causal_core::ModelFitter) seam: Gaussian (identity
//! link) outcome regressions and logistic (logit link) exposure models,
//! fitted by IRLS.
//!
//! # Example
//!
//! ```rust
//! use causal_core::{Dataset, FittedModel, ModelFitter};
//! use causal_glm::{Family, Glm, ModelSpec};
//!
//! let data = Dataset::builder()
//!     .numeric("y", vec![1.0, 3.0, 5.0, 7.0])
//!     .numeric("x", vec![0.0, 1.0, 2.0, 3.0])
//!     .build()
//!     .unwrap();
//!
//! let model = Glm::new(ModelSpec::new("y", Family::Gaussian).linear("x"));
//! let fit = model.fit(&data).unwrap();
//! assert!((fit.coefficient("x").unwrap() - 2.0).abs() < 1e-10);
//! ```

mod family;
mod solver;
pub mod spec;

pub use family::Family;
pub use solver::{fit_irls, IrlsConfig, IrlsResult};
pub use spec::{Design, ModelSpec, Term, INTERCEPT};

use causal_core::{Dataset, Error, FittedModel, ModelFitter, Result};
use nalgebra::DVector;
use tracing::debug;

/// GLM fitter: a model spec plus IRLS controls
#[derive(Debug, Clone, PartialEq)]
pub struct Glm {
    spec: ModelSpec,
    config: IrlsConfig,
}

impl Glm {
    /// Create a fitter for `spec` with default IRLS controls
    pub fn new(spec: ModelSpec) -> Self {
        Self {
            spec,
            config: IrlsConfig::default(),
        }
    }

    /// Gaussian outcome model with the given terms
    pub fn linear(response: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        let mut spec = ModelSpec::new(response, Family::Gaussian);
        spec.terms.extend(terms);
        Self::new(spec)
    }

    /// Logistic model with the given terms
    pub fn logistic(response: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        let mut spec = ModelSpec::new(response, Family::Binomial);
        spec.terms.extend(terms);
        Self::new(spec)
    }

    /// Intercept-only logistic model, P(response = 1)
    ///
    /// Used as the numerator of stabilized weights.
    pub fn marginal(response: impl Into<String>) -> Self {
        Self::new(ModelSpec::new(response, Family::Binomial))
    }

    /// Set the IRLS iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        assert!(max_iterations > 0, "max_iterations must be positive");
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the relative deviance tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        assert!(tolerance > 0.0, "tolerance must be positive");
        self.config.tolerance = tolerance;
        self
    }

    /// The model specification
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }
}

impl ModelFitter for Glm {
    type Fitted = GlmFit;

    fn fit(&self, data: &Dataset) -> Result<GlmFit> {
        let rows = self.spec.fitting_rows(data)?;
        if rows.is_empty() {
            return Err(Error::ModelFit(format!(
                "no complete rows to fit {}",
                self.spec.response
            )));
        }

        let response = data.numeric(&self.spec.response)?;
        let y: Vec<f64> = rows.iter().map(|&i| response[i]).collect();
        self.spec.family.validate_response(&y)?;

        let design = self.spec.design(data, &rows)?;
        let result = fit_irls(
            &design.matrix,
            &DVector::from_vec(y),
            self.spec.family,
            &self.config,
        )?;

        debug!(
            response = %self.spec.response,
            n_obs = rows.len(),
            n_coef = design.names.len(),
            iterations = result.iterations,
            deviance = result.deviance,
            "GLM fitted"
        );

        Ok(GlmFit {
            spec: self.spec.clone(),
            names: design.names,
            coefficients: result.coefficients,
            deviance: result.deviance,
            iterations: result.iterations,
            n_obs: rows.len(),
        })
    }
}

/// A fitted GLM
#[derive(Debug, Clone)]
pub struct GlmFit {
    spec: ModelSpec,
    names: Vec<String>,
    coefficients: DVector<f64>,
    deviance: f64,
    iterations: usize,
    n_obs: usize,
}

impl GlmFit {
    /// Coefficient names, intercept first
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coefficient values in the order of [`GlmFit::names`]
    pub fn coefficients(&self) -> &[f64] {
        self.coefficients.as_slice()
    }

    /// Look up one coefficient by name
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.coefficients[i])
    }

    /// Residual deviance
    pub fn deviance(&self) -> f64 {
        self.deviance
    }

    /// IRLS iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of rows used in the fit
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Linear predictor for every row of `data`
    ///
    /// Rows with missing covariates get `NaN`.
    pub fn linear_predictor(&self, data: &Dataset) -> Result<Vec<f64>> {
        let rows: Vec<usize> = (0..data.n_rows()).collect();
        let design = self.spec.design(data, &rows)?;
        if design.names != self.names {
            return Err(Error::InvalidInput(format!(
                "prediction design {:?} does not match fitted terms {:?}",
                design.names, self.names
            )));
        }
        Ok((&design.matrix * &self.coefficients).iter().copied().collect())
    }
}

impl FittedModel for GlmFit {
    fn predict(&self, data: &Dataset) -> Result<Vec<f64>> {
        let family = self.spec.family;
        Ok(self
            .linear_predictor(data)?
            .into_iter()
            .map(|eta| family.inverse_link(eta))
            .collect())
    }
}
