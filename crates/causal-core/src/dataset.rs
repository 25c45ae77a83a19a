//! Column-oriented datasets
//!
//! A [`Dataset`] is an ordered collection of rows (subjects) stored as
//! named columns of equal length. Numeric columns use `NaN` for missing
//! values. Categorical columns store integer codes into a level table;
//! the level table belongs to the column and is carried unchanged into
//! every row selection, so a bootstrap replicate that happens to miss a
//! level still knows the level exists.

use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A single named column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Continuous or indicator values; `NaN` marks a missing value
    Numeric(Vec<f64>),
    /// Codes into a shared level table
    Categorical {
        codes: Vec<u32>,
        levels: Arc<[String]>,
    },
}

impl Column {
    /// Build a categorical column from string values
    ///
    /// Levels are ordered by first appearance.
    pub fn categorical<S: AsRef<str>>(values: &[S]) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let mut lookup: HashMap<String, u32> = HashMap::new();
        let codes = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                *lookup.entry(v.to_string()).or_insert_with(|| {
                    levels.push(v.to_string());
                    (levels.len() - 1) as u32
                })
            })
            .collect();
        Self::Categorical {
            codes,
            levels: levels.into(),
        }
    }

    /// Build a categorical column from codes and an explicit level table
    pub fn categorical_with_levels(codes: Vec<u32>, levels: Vec<String>) -> Result<Self> {
        if let Some(&bad) = codes.iter().find(|&&c| c as usize >= levels.len()) {
            return Err(Error::InvalidInput(format!(
                "Category code {bad} out of range for {} levels",
                levels.len()
            )));
        }
        Ok(Self::Categorical {
            codes,
            levels: levels.into(),
        })
    }

    /// Number of rows in this column
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical { codes, .. } => codes.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, indices: &[usize]) -> Self {
        match self {
            Self::Numeric(v) => Self::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Self::Categorical { codes, levels } => Self::Categorical {
                codes: indices.iter().map(|&i| codes[i]).collect(),
                levels: Arc::clone(levels),
            },
        }
    }
}

/// An ordered collection of rows stored column-wise
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Create an empty dataset with no columns and no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a dataset column by column
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Number of rows (subjects)
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Values of a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v.as_slice()),
            Column::Categorical { .. } => Err(Error::ColumnKind {
                name: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Codes and level table of a categorical column
    pub fn categorical(&self, name: &str) -> Result<(&[u32], &[String])> {
        match self.column(name)? {
            Column::Categorical { codes, levels } => Ok((codes.as_slice(), &levels[..])),
            Column::Numeric(_) => Err(Error::ColumnKind {
                name: name.to_string(),
                expected: "categorical",
            }),
        }
    }

    /// Add or replace a column
    ///
    /// The column length must match the existing row count unless the
    /// dataset has no columns yet.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(Error::size_mismatch(
                self.n_rows,
                column.len(),
                &format!("column {name}"),
            ));
        }
        self.n_rows = column.len();
        match self.position(&name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Build a new dataset from the rows at `indices`
    ///
    /// Order is preserved and repeated indices produce repeated rows, so
    /// this is how bootstrap replicates are materialized. The original
    /// dataset is untouched.
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    /// Copy of this dataset with a numeric column forced to `value`
    ///
    /// Used to build counterfactual datasets ("everyone exposed",
    /// "no one exposed") for standardization.
    pub fn with_constant(&self, name: &str, value: f64) -> Result<Dataset> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        if !matches!(self.columns[idx], Column::Numeric(_)) {
            return Err(Error::ColumnKind {
                name: name.to_string(),
                expected: "numeric",
            });
        }
        let mut out = self.clone();
        out.columns[idx] = Column::Numeric(vec![value; self.n_rows]);
        Ok(out)
    }

    /// Row indices where every listed numeric column is observed
    ///
    /// Categorical columns never contain missing values.
    pub fn complete_rows(&self, names: &[&str]) -> Result<Vec<usize>> {
        let numeric: Vec<&[f64]> = names
            .iter()
            .filter_map(|&n| match self.column(n) {
                Ok(Column::Numeric(v)) => Some(Ok(v.as_slice())),
                Ok(Column::Categorical { .. }) => None,
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<_>>()?;
        Ok((0..self.n_rows)
            .filter(|&i| numeric.iter().all(|col| !col[i].is_nan()))
            .collect())
    }
}

/// Incremental builder for [`Dataset`]
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<(String, Column)>,
}

impl DatasetBuilder {
    /// Add a numeric column
    pub fn numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), Column::Numeric(values)));
        self
    }

    /// Add a categorical column from string values
    pub fn categorical<S: AsRef<str>>(mut self, name: impl Into<String>, values: &[S]) -> Self {
        self.columns.push((name.into(), Column::categorical(values)));
        self
    }

    /// Add a prebuilt column
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// Validate lengths and names and produce the dataset
    pub fn build(self) -> Result<Dataset> {
        let mut dataset = Dataset::new();
        for (name, column) in self.columns {
            if dataset.has_column(&name) {
                return Err(Error::InvalidInput(format!("Duplicate column name: {name}")));
            }
            dataset.insert_column(name, column)?;
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::builder()
            .numeric("y", vec![1.0, 2.0, f64::NAN, 4.0])
            .numeric("a", vec![0.0, 1.0, 0.0, 1.0])
            .categorical("edu", &["hs", "college", "hs", "none"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_and_lookup() {
        let ds = sample();
        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["y", "a", "edu"]);
        assert_eq!(ds.numeric("a").unwrap(), &[0.0, 1.0, 0.0, 1.0]);

        let (codes, levels) = ds.categorical("edu").unwrap();
        assert_eq!(codes, &[0, 1, 0, 2]);
        assert_eq!(levels, &["hs".to_string(), "college".to_string(), "none".to_string()]);
    }

    #[test]
    fn test_lookup_errors() {
        let ds = sample();
        assert!(matches!(ds.numeric("missing"), Err(Error::ColumnNotFound(_))));
        assert!(matches!(ds.numeric("edu"), Err(Error::ColumnKind { .. })));
        assert!(matches!(ds.categorical("a"), Err(Error::ColumnKind { .. })));
    }

    #[test]
    fn test_builder_rejects_bad_shapes() {
        let err = Dataset::builder()
            .numeric("y", vec![1.0, 2.0])
            .numeric("a", vec![0.0])
            .build();
        assert!(matches!(err, Err(Error::InvalidInput(_))));

        let err = Dataset::builder()
            .numeric("y", vec![1.0])
            .numeric("y", vec![2.0])
            .build();
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_select_rows_keeps_order_and_duplicates() {
        let ds = sample();
        let replicate = ds.select_rows(&[3, 3, 0, 1]);

        assert_eq!(replicate.n_rows(), 4);
        assert_eq!(replicate.numeric("a").unwrap(), &[1.0, 1.0, 0.0, 1.0]);
        let (codes, levels) = replicate.categorical("edu").unwrap();
        assert_eq!(codes, &[2, 2, 0, 1]);
        assert_eq!(levels.len(), 3);

        // Original untouched
        assert_eq!(ds.numeric("a").unwrap(), &[0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_select_rows_keeps_absent_levels() {
        let ds = sample();
        let replicate = ds.select_rows(&[0, 0, 2, 2]);
        let (codes, levels) = replicate.categorical("edu").unwrap();
        assert_eq!(codes, &[0, 0, 0, 0]);
        assert_eq!(levels.len(), 3);
    }

    #[test]
    fn test_with_constant() {
        let ds = sample();
        let treated = ds.with_constant("a", 1.0).unwrap();
        assert_eq!(treated.numeric("a").unwrap(), &[1.0; 4]);
        assert_eq!(ds.numeric("a").unwrap(), &[0.0, 1.0, 0.0, 1.0]);

        assert!(ds.with_constant("edu", 1.0).is_err());
        assert!(ds.with_constant("nope", 1.0).is_err());
    }

    #[test]
    fn test_complete_rows() {
        let ds = sample();
        assert_eq!(ds.complete_rows(&["y", "a", "edu"]).unwrap(), vec![0, 1, 3]);
        assert_eq!(ds.complete_rows(&["a"]).unwrap(), vec![0, 1, 2, 3]);
        assert!(ds.complete_rows(&["nope"]).is_err());
    }

    #[test]
    fn test_categorical_with_levels_validates_codes() {
        let ok = Column::categorical_with_levels(vec![0, 1], vec!["a".into(), "b".into()]);
        assert!(ok.is_ok());
        let bad = Column::categorical_with_levels(vec![0, 2], vec!["a".into(), "b".into()]);
        assert!(bad.is_err());
    }
}
