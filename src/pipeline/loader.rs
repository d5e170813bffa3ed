//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

use super::target::STATUS_COLUMN;

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` bounds the rows used for CSV type inference;
/// 0 scans the whole file. Column types decide the numeric/categorical
/// split later on, so a short window can move a column between paths.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    load_dataset_with_text_columns(path, infer_schema_length, &[])
}

/// Load a dataset, reading the named CSV columns as text without inference.
///
/// Code columns such as `STATUS` mix digits and letters; a digit-only
/// inference window would otherwise type them as integers and fail on the
/// first letter further down. Parquet files keep their stored types.
pub fn load_dataset_with_text_columns(
    path: &Path,
    infer_schema_length: usize,
    text_columns: &[&str],
) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .with_dtype_overwrite(text_overrides(text_columns))
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

fn text_overrides(columns: &[&str]) -> Option<SchemaRef> {
    if columns.is_empty() {
        return None;
    }
    let schema = Schema::from_iter(
        columns
            .iter()
            .map(|name| Field::new((*name).into(), DataType::String)),
    );
    Some(Arc::new(schema))
}

/// Load the applicant and credit-history tables together.
///
/// Both paths are checked before either file is parsed so that a missing
/// input is reported up front, naming both expected files.
pub fn load_training_inputs(
    applications: &Path,
    credit_records: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, DataFrame)> {
    let missing: Vec<String> = [applications, credit_records]
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "Input file(s) not found: {}. Make sure '{}' and '{}' are in the expected location.",
            missing.join(", "),
            applications.display(),
            credit_records.display()
        );
    }

    let applicants = load_dataset(applications, infer_schema_length)?;
    let credit =
        load_dataset_with_text_columns(credit_records, infer_schema_length, &[STATUS_COLUMN])?;
    Ok((applicants, credit))
}
