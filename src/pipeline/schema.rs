//! Feature schema inferred from column storage types

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Feature type as seen by the preprocessing transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Numeric,
    Categorical,
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureType::Numeric => write!(f, "numeric"),
            FeatureType::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single named feature and its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub feature_type: FeatureType,
}

impl FeatureSpec {
    pub fn new(name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            name: name.into(),
            feature_type,
        }
    }
}

/// Ordered list of model features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        Self { features }
    }

    /// Infer the schema from runtime column types.
    ///
    /// Primitive numeric columns are numeric, string columns are categorical.
    /// Anything else (booleans, dates, lists) is left out of the model.
    pub fn infer(df: &DataFrame) -> Self {
        let mut features = Vec::new();
        for col in df.get_columns() {
            let name = col.name().to_string();
            if col.dtype().is_primitive_numeric() {
                features.push(FeatureSpec::new(name, FeatureType::Numeric));
            } else if matches!(col.dtype(), DataType::String | DataType::Categorical(_, _)) {
                features.push(FeatureSpec::new(name, FeatureType::Categorical));
            } else {
                tracing::debug!(column = %name, dtype = %col.dtype(), "ignoring column with unsupported dtype");
            }
        }
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn numeric(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features
            .iter()
            .filter(|f| f.feature_type == FeatureType::Numeric)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features
            .iter()
            .filter(|f| f.feature_type == FeatureType::Categorical)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }

    /// List the ways `self` cannot be fed from inputs shaped like `provided`.
    ///
    /// Every feature of `self` must exist in `provided` with the same type.
    /// Extra features in `provided` are fine; they are never read.
    pub fn incompatibilities(&self, provided: &FeatureSchema) -> Vec<String> {
        self.features
            .iter()
            .filter_map(|f| match provided.get(&f.name) {
                None => Some(format!("feature '{}' is missing", f.name)),
                Some(p) if p.feature_type != f.feature_type => Some(format!(
                    "feature '{}' is {} but {} was expected",
                    f.name, p.feature_type, f.feature_type
                )),
                Some(_) => None,
            })
            .collect()
    }
}
