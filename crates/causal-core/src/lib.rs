//! Core traits and types for causal-effect estimation
//!
//! This crate provides the foundation shared by the rest of the
//! workspace:
//!
//! - [`Dataset`]: column-oriented rows with numeric and categorical columns
//! - [`Estimator`]: the capability the bootstrap engine resamples over
//! - [`ModelFitter`] / [`FittedModel`]: the outcome / propensity model seam
//! - [`Error`] / [`Result`]: one error type for every crate
//! - [`utils`]: mean, sample standard deviation, type-7 quantiles

pub mod dataset;
pub mod error;
pub mod traits;
pub mod utils;

pub use dataset::{Column, Dataset, DatasetBuilder};
pub use error::{Error, Result};
pub use traits::{estimator_fn, EstimateVector, Estimator, FittedModel, FnEstimator, ModelFitter};
