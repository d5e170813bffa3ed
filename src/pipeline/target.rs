//! Target derivation from credit history
//!
//! Each applicant identifier is labelled as a bad client when any month of
//! its credit history shows a delinquency of 60 days or more. The label is
//! sticky: later recovery does not clear it.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Identifier column shared by the applicant and credit-history tables
pub const ID_COLUMN: &str = "ID";

/// Monthly status column in the credit-history table
pub const STATUS_COLUMN: &str = "STATUS";

/// Name of the derived binary target
pub const TARGET_COLUMN: &str = "is_bad_client";

/// Status codes counted as delinquent: 60-89, 90-119, 120-149 and 150+ days
pub const DELINQUENT_STATUSES: [&str; 4] = ["2", "3", "4", "5"];

/// Whether a single monthly status code is a delinquency
pub fn is_delinquent(status: &str) -> bool {
    DELINQUENT_STATUSES.contains(&status.trim())
}

/// Derive one `is_bad_client` label per distinct identifier.
///
/// Returns a DataFrame with `ID` (Int64) and `is_bad_client` (Int32, 0/1),
/// ordered by `ID`. Identifiers without any history rows never appear.
pub fn derive_labels(credit: &DataFrame) -> Result<DataFrame> {
    let ids = id_values(credit)?;

    let status_col = credit
        .column(STATUS_COLUMN)
        .with_context(|| format!("Credit history column '{}' not found", STATUS_COLUMN))?;
    // STATUS is compared as text whatever dtype inference picked
    let status_str = status_col.cast(&DataType::String)?;
    let statuses = status_str.str()?;

    let mut labels: BTreeMap<i64, i32> = BTreeMap::new();
    for (id, status) in ids.into_iter().zip(statuses.iter()) {
        let Some(id) = id else {
            continue;
        };
        let bad = i32::from(status.map(is_delinquent).unwrap_or(false));
        let entry = labels.entry(id).or_insert(0);
        *entry = (*entry).max(bad);
    }

    let (ids, flags): (Vec<i64>, Vec<i32>) = labels.into_iter().unzip();

    DataFrame::new(vec![
        Column::new(ID_COLUMN.into(), ids),
        Column::new(TARGET_COLUMN.into(), flags),
    ])
    .context("Failed to build label table")
}

/// Read the identifier column as Int64 values
pub(crate) fn id_values(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    let id_col = df
        .column(ID_COLUMN)
        .with_context(|| format!("Identifier column '{}' not found", ID_COLUMN))?;
    let cast = id_col
        .cast(&DataType::Int64)
        .with_context(|| format!("Identifier column '{}' must be an integer", ID_COLUMN))?;
    Ok(cast.i64()?.into_iter().collect())
}

/// Count (bad, good) clients in a label table
pub fn count_labels(labels: &DataFrame) -> Result<(usize, usize)> {
    let flags = labels
        .column(TARGET_COLUMN)
        .with_context(|| format!("Label column '{}' not found", TARGET_COLUMN))?
        .cast(&DataType::Int32)?;
    let flags = flags.i32()?;

    let bad = flags.into_iter().filter(|v| *v == Some(1)).count();
    let good = flags.into_iter().filter(|v| *v == Some(0)).count();
    Ok((bad, good))
}
