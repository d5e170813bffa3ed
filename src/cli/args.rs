//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{ClassWeight, DEFAULT_ARTIFACT_PATH, DEFAULT_SEED, DEFAULT_TEST_SIZE};

/// Credrisk - Train a credit-risk classifier and save the fitted pipeline
#[derive(Parser, Debug)]
#[command(name = "credrisk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Applicant table (CSV or Parquet), one row per applicant keyed by ID
    #[arg(short, long, default_value = "application_record.csv")]
    pub applications: PathBuf,

    /// Credit history table (CSV or Parquet) with ID and monthly STATUS codes
    #[arg(short, long, default_value = "credit_record.csv")]
    pub credit_records: PathBuf,

    /// Where to write the fitted pipeline artifact
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub output: PathBuf,

    /// Share of rows held out for evaluation (stratified on the target)
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE, value_parser = validate_test_size)]
    pub test_size: f64,

    /// Seed for the train/test split shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Iteration budget for the logistic regression solver
    #[arg(long, default_value = "1000")]
    pub max_iter: usize,

    /// Inverse L2 regularisation strength (smaller = stronger regularisation)
    #[arg(long, default_value = "1.0", value_parser = validate_positive)]
    pub c: f64,

    /// Class weighting: "balanced" (inverse class frequency, default) or "none"
    #[arg(long, default_value = "balanced")]
    pub class_weight: ClassWeight,

    /// Number of rows to use for schema inference (CSV only).
    /// Column types decide which features are numeric or categorical.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Validator for the test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

/// Validator for strictly positive parameters
fn validate_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("value must be a positive number, got {}", value))
    }
}
