//! Feature/target assembly
//!
//! Inner-joins applicants with their derived labels and strips the columns
//! that carry no signal. Applicants without any credit history are dropped
//! on purpose: the model only learns from clients whose outcome is known.

use std::collections::HashMap;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::schema::FeatureSchema;
use super::target::{id_values, ID_COLUMN, TARGET_COLUMN};

/// Constant mobile-phone flag, always 1 in the applicant table
pub const FLAG_MOBIL_COLUMN: &str = "FLAG_MOBIL";

/// Columns removed from the feature matrix
pub const EXCLUDED_COLUMNS: [&str; 2] = [ID_COLUMN, FLAG_MOBIL_COLUMN];

/// Features, target and the schema inferred for them
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: DataFrame,
    pub target: Vec<i32>,
    pub schema: FeatureSchema,
    /// Applicant rows dropped for lack of credit history
    pub unmatched_applicants: usize,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Share of rows labelled bad
    pub fn bad_rate(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.target.iter().filter(|&&t| t == 1).count() as f64 / self.target.len() as f64
    }
}

/// Join applicants with labels on `ID` (inner, applicant order preserved).
///
/// Every applicant row whose identifier has a label is kept, duplicates
/// included; the rest are dropped without error. `ID` and `FLAG_MOBIL`
/// are removed from the features.
pub fn assemble_training_set(applicants: &DataFrame, labels: &DataFrame) -> Result<TrainingSet> {
    let label_ids = id_values(labels).context("Label table is malformed")?;
    let label_col = labels
        .column(TARGET_COLUMN)
        .with_context(|| format!("Label column '{}' not found", TARGET_COLUMN))?
        .cast(&DataType::Int32)?;
    let label_flags = label_col.i32()?;

    let lookup: HashMap<i64, i32> = label_ids
        .into_iter()
        .zip(label_flags.into_iter())
        .filter_map(|(id, flag)| Some((id?, flag?)))
        .collect();

    let applicant_ids = id_values(applicants).context("Applicant table is malformed")?;

    let mut keep = Vec::with_capacity(applicant_ids.len());
    let mut target = Vec::new();
    for id in &applicant_ids {
        match id.and_then(|id| lookup.get(&id)) {
            Some(&flag) => {
                keep.push(true);
                target.push(flag);
            }
            None => keep.push(false),
        }
    }

    if target.is_empty() {
        anyhow::bail!(
            "No applicant matched a credit history record ({} applicants, {} labelled clients)",
            applicants.height(),
            lookup.len()
        );
    }

    let mask = BooleanChunked::from_slice("mask".into(), &keep);
    let joined = applicants
        .filter(&mask)
        .context("Failed to filter applicants")?;

    let features = joined.drop_many(EXCLUDED_COLUMNS);
    let schema = FeatureSchema::infer(&features);

    if schema.is_empty() {
        anyhow::bail!("Applicant table has no usable feature columns");
    }

    Ok(TrainingSet {
        unmatched_applicants: applicants.height() - target.len(),
        features,
        target,
        schema,
    })
}
