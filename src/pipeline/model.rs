//! The fitted pipeline: preprocessing transformer + classifier

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::classifier::{LogisticModel, LogisticRegression, SolverStats};
use super::preprocess::FittedPreprocessor;
use super::schema::FeatureSchema;

/// Artifact layout this build reads and writes
pub const ARTIFACT_FORMAT: u32 = 1;

/// Risk class predicted for an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    High,
}

impl RiskLabel {
    pub fn from_class(class: i32) -> Self {
        if class == 1 {
            RiskLabel::High
        } else {
            RiskLabel::Low
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "BAIXO RISCO"),
            RiskLabel::High => write!(f, "ALTO RISCO"),
        }
    }
}

/// A single scored applicant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPrediction {
    pub label: RiskLabel,
    pub probability_low: f64,
    pub probability_high: f64,
}

/// Fitted transformer + classifier, persisted as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPipeline {
    pub format: u32,
    pub schema: FeatureSchema,
    pub preprocessor: FittedPreprocessor,
    pub classifier: LogisticModel,
}

impl RiskPipeline {
    /// Fit preprocessing and classifier on the training rows
    pub fn fit(
        features: &DataFrame,
        target: &[i32],
        schema: &FeatureSchema,
        solver: &LogisticRegression,
    ) -> Result<(Self, SolverStats)> {
        let preprocessor =
            FittedPreprocessor::fit(features, schema).context("Failed to fit preprocessing")?;
        let x = preprocessor.transform(features)?;
        let (classifier, stats) = solver.fit(&x, target).context("Failed to fit classifier")?;

        Ok((
            Self {
                format: ARTIFACT_FORMAT,
                schema: schema.clone(),
                preprocessor,
                classifier,
            },
            stats,
        ))
    }

    /// `[P(low), P(high)]` for each row
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Vec<[f64; 2]>> {
        let x = self.preprocessor.transform(df)?;
        self.classifier.predict_proba(&x)
    }

    /// 0/1 class for each row
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<i32>> {
        let x = self.preprocessor.transform(df)?;
        self.classifier.predict(&x)
    }

    /// Score every row as a labelled prediction
    pub fn predict_risk(&self, df: &DataFrame) -> Result<Vec<RiskPrediction>> {
        Ok(self
            .predict_proba(df)?
            .into_iter()
            .map(|[low, high]| RiskPrediction {
                label: RiskLabel::from_class(i32::from(high > 0.5)),
                probability_low: low,
                probability_high: high,
            })
            .collect())
    }

    /// Share of rows whose predicted class equals `target`
    pub fn score(&self, df: &DataFrame, target: &[i32]) -> Result<f64> {
        let predicted = self.predict(df)?;
        if predicted.len() != target.len() {
            anyhow::bail!(
                "Got {} predictions for {} target values",
                predicted.len(),
                target.len()
            );
        }
        if target.is_empty() {
            anyhow::bail!("Cannot score an empty dataset");
        }

        let hits = predicted
            .iter()
            .zip(target.iter())
            .filter(|(p, t)| p == t)
            .count();
        Ok(hits as f64 / target.len() as f64)
    }

    /// Width of the design matrix the classifier was fitted on
    pub fn encoded_width(&self) -> usize {
        self.preprocessor.output_width()
    }
}
