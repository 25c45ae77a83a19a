//! Model specifications and design-matrix construction
//!
//! A [`ModelSpec`] names a response column, a [`Family`], and a list of
//! right-hand-side [`Term`]s. An intercept is always included; a spec
//! with no terms is the marginal (intercept-only) model.

use crate::Family;
use causal_core::{Column, Dataset, Error, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// One right-hand-side term of a model formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// A numeric column entered as-is
    Linear(String),
    /// The square of a numeric column
    Quadratic(String),
    /// Indicators for every level of a categorical column except the first
    Categorical(String),
    /// Product of two numeric columns
    Interaction(String, String),
}

impl Term {
    fn numeric_columns(&self) -> Vec<&str> {
        match self {
            Self::Linear(c) | Self::Quadratic(c) => vec![c.as_str()],
            Self::Categorical(_) => Vec::new(),
            Self::Interaction(a, b) => vec![a.as_str(), b.as_str()],
        }
    }

    /// Design-matrix columns contributed by this term: names and values
    /// for the requested rows
    fn expand(&self, data: &Dataset, rows: &[usize]) -> Result<Vec<(String, Vec<f64>)>> {
        let out = match self {
            Self::Linear(c) => {
                let x = data.numeric(c)?;
                vec![(c.clone(), rows.iter().map(|&i| x[i]).collect())]
            }
            Self::Quadratic(c) => {
                let x = data.numeric(c)?;
                vec![(format!("{c}^2"), rows.iter().map(|&i| x[i] * x[i]).collect())]
            }
            Self::Categorical(c) => {
                let (codes, levels) = data.categorical(c)?;
                levels
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(level, label)| {
                        let values = rows
                            .iter()
                            .map(|&i| if codes[i] as usize == level { 1.0 } else { 0.0 })
                            .collect();
                        (format!("{c}[{label}]"), values)
                    })
                    .collect()
            }
            Self::Interaction(a, b) => {
                let xa = data.numeric(a)?;
                let xb = data.numeric(b)?;
                vec![(
                    format!("{a}:{b}"),
                    rows.iter().map(|&i| xa[i] * xb[i]).collect(),
                )]
            }
        };
        Ok(out)
    }
}

/// Response, family and terms of a generalized linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub response: String,
    pub family: Family,
    #[serde(default)]
    pub terms: Vec<Term>,
}

/// Name of the intercept coefficient
pub const INTERCEPT: &str = "(Intercept)";

impl ModelSpec {
    /// Create a spec with no terms (marginal model)
    pub fn new(response: impl Into<String>, family: Family) -> Self {
        Self {
            response: response.into(),
            family,
            terms: Vec::new(),
        }
    }

    /// Add a term
    pub fn term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    /// Add a linear numeric term
    pub fn linear(self, column: impl Into<String>) -> Self {
        self.term(Term::Linear(column.into()))
    }

    /// Add a squared numeric term
    pub fn quadratic(self, column: impl Into<String>) -> Self {
        self.term(Term::Quadratic(column.into()))
    }

    /// Add a linear and a squared term for the same column
    pub fn linear_and_quadratic(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.linear(column.clone()).quadratic(column)
    }

    /// Add indicator terms for a categorical column
    pub fn categorical(self, column: impl Into<String>) -> Self {
        self.term(Term::Categorical(column.into()))
    }

    /// Add a product term of two numeric columns
    pub fn interaction(self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.term(Term::Interaction(a.into(), b.into()))
    }

    /// Whether the spec has no covariate terms
    pub fn is_marginal(&self) -> bool {
        self.terms.is_empty()
    }

    /// Numeric covariate columns that must be observed for a row to be used
    pub fn covariate_columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = Vec::new();
        for c in self.terms.iter().flat_map(Term::numeric_columns) {
            if !cols.contains(&c) {
                cols.push(c);
            }
        }
        cols
    }

    /// Rows usable for fitting: response and numeric covariates observed
    pub fn fitting_rows(&self, data: &Dataset) -> Result<Vec<usize>> {
        let mut cols = vec![self.response.as_str()];
        cols.extend(self.covariate_columns());
        for term in &self.terms {
            if let Term::Categorical(c) = term {
                if !matches!(data.column(c)?, Column::Categorical { .. }) {
                    return Err(Error::ColumnKind {
                        name: c.clone(),
                        expected: "categorical",
                    });
                }
            }
        }
        data.complete_rows(&cols)
    }

    /// Build the design matrix (intercept first) for the given rows
    pub fn design(&self, data: &Dataset, rows: &[usize]) -> Result<Design> {
        let mut names = vec![INTERCEPT.to_string()];
        let mut columns = vec![vec![1.0; rows.len()]];
        for term in &self.terms {
            for (name, values) in term.expand(data, rows)? {
                names.push(name);
                columns.push(values);
            }
        }
        let matrix = DMatrix::from_fn(rows.len(), columns.len(), |i, j| columns[j][i]);
        Ok(Design { names, matrix })
    }
}

/// A design matrix with coefficient names
#[derive(Debug, Clone)]
pub struct Design {
    pub names: Vec<String>,
    pub matrix: DMatrix<f64>,
}
