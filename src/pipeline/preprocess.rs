//! Column-wise preprocessing transformer
//!
//! Numeric columns: median imputation, then standardisation.
//! Categorical columns: constant imputation, then one-hot encoding with
//! unseen categories mapped to an all-zero block.
//!
//! All statistics come from the training rows only and are frozen into the
//! fitted transformer, which fixes the width and order of the output matrix.

use anyhow::{Context, Result};
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::schema::{FeatureSchema, FeatureSpec};

/// Placeholder category for missing categorical values
pub const MISSING_CATEGORY: &str = "missing";

/// Scales below this are treated as zero variance
const MIN_SCALE: f64 = 1e-12;

/// Fitted median imputer + standard scaler for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTransform {
    pub name: String,
    pub median: f64,
    pub mean: f64,
    pub scale: f64,
}

impl NumericTransform {
    #[inline]
    pub fn apply(&self, value: Option<f64>) -> f64 {
        (value.unwrap_or(self.median) - self.mean) / self.scale
    }
}

/// Fitted constant imputer + one-hot encoder for one categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTransform {
    pub name: String,
    /// Sorted distinct training categories (the imputed placeholder included)
    pub categories: Vec<String>,
}

impl CategoricalTransform {
    /// Position of the active indicator, `None` for unseen categories
    #[inline]
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Preprocessing transformer fitted on training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    pub numeric: Vec<NumericTransform>,
    pub categorical: Vec<CategoricalTransform>,
}

impl FittedPreprocessor {
    /// Fit per-column statistics on `df` for every feature in `schema`
    pub fn fit(df: &DataFrame, schema: &FeatureSchema) -> Result<Self> {
        if df.height() == 0 {
            anyhow::bail!("Cannot fit preprocessing on an empty dataset");
        }

        let numeric_specs: Vec<&FeatureSpec> = schema.numeric().collect();
        let categorical_specs: Vec<&FeatureSpec> = schema.categorical().collect();

        let numeric = numeric_specs
            .par_iter()
            .map(|spec| fit_numeric(df, &spec.name))
            .collect::<Result<Vec<_>>>()?;

        let categorical = categorical_specs
            .par_iter()
            .map(|spec| fit_categorical(df, &spec.name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// Number of columns produced by `transform`
    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    /// Names of the produced columns, in output order
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|n| n.name.clone()).collect();
        for cat in &self.categorical {
            for category in &cat.categories {
                names.push(format!("{}_{}", cat.name, category));
            }
        }
        names
    }

    /// Transform `df` into the fixed-width design matrix.
    ///
    /// Columns are looked up by name; extra columns are ignored and a missing
    /// one is an error.
    pub fn transform(&self, df: &DataFrame) -> Result<Mat<f64>> {
        let n_rows = df.height();
        let mut x = Mat::<f64>::zeros(n_rows, self.output_width());

        for (j, num) in self.numeric.iter().enumerate() {
            let values = numeric_values(df, &num.name)?;
            for (i, value) in values.into_iter().enumerate() {
                x[(i, j)] = num.apply(value);
            }
        }

        let mut offset = self.numeric.len();
        for cat in &self.categorical {
            let values = categorical_values(df, &cat.name)?;
            for (i, value) in values.iter().enumerate() {
                if let Some(k) = cat.position(value) {
                    x[(i, offset + k)] = 1.0;
                }
            }
            offset += cat.categories.len();
        }

        Ok(x)
    }
}

fn fit_numeric(df: &DataFrame, name: &str) -> Result<NumericTransform> {
    let values = numeric_values(df, name)?;

    let mut present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let median = if present.is_empty() {
        tracing::warn!(column = name, "numeric column has no values, imputing 0");
        0.0
    } else {
        median(&mut present)
    };

    let n = values.len() as f64;
    let imputed = values.iter().map(|v| v.unwrap_or(median));
    let mean = imputed.clone().sum::<f64>() / n;
    let variance = imputed.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = variance.sqrt();
    let scale = if std < MIN_SCALE { 1.0 } else { std };

    Ok(NumericTransform {
        name: name.to_string(),
        median,
        mean,
        scale,
    })
}

fn fit_categorical(df: &DataFrame, name: &str) -> Result<CategoricalTransform> {
    let mut categories = categorical_values(df, name)?;
    categories.sort_unstable();
    categories.dedup();

    Ok(CategoricalTransform {
        name: name.to_string(),
        categories,
    })
}

/// Median of a non-empty slice (mean of the two middle values for even length)
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Column values as f64, with nulls and NaN as `None`
fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .with_context(|| format!("Feature column '{}' not found", name))?;
    let cast = col
        .cast(&DataType::Float64)
        .with_context(|| format!("Feature column '{}' is not numeric", name))?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Column values as strings, with nulls replaced by the placeholder
fn categorical_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let col = df
        .column(name)
        .with_context(|| format!("Feature column '{}' not found", name))?;
    let cast = col.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(MISSING_CATEGORY).to_string())
        .collect())
}
