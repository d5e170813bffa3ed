//! Stratified train/test holdout split

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default share of rows held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default seed for the split shuffle
pub const DEFAULT_SEED: u64 = 42;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Select the training rows of a DataFrame
    pub fn take_train(&self, df: &DataFrame) -> Result<DataFrame> {
        take_rows(df, &self.train)
    }

    /// Select the test rows of a DataFrame
    pub fn take_test(&self, df: &DataFrame) -> Result<DataFrame> {
        take_rows(df, &self.test)
    }
}

/// Split row indices so both partitions keep the class ratio of `target`.
///
/// The test partition gets `ceil(test_size * n)` rows. Each class receives
/// its proportional share rounded down, and the leftover seats go to the
/// classes with the largest fractional remainder. Rows are drawn from a
/// seeded shuffle, so the same seed always yields the same partitions.
pub fn stratified_split(target: &[i32], test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        anyhow::bail!("test_size must be between 0 and 1 (exclusive), got {}", test_size);
    }

    let n = target.len();
    if n < 2 {
        anyhow::bail!("Need at least 2 rows to split, got {}", n);
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n - n_test;
    if n_test == 0 || n_train == 0 {
        anyhow::bail!(
            "test_size {} leaves an empty partition for {} rows",
            test_size,
            n
        );
    }

    let mut by_class: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, &t) in target.iter().enumerate() {
        by_class.entry(t).or_default().push(i);
    }

    if by_class.values().any(|rows| rows.len() < 2) {
        anyhow::bail!(
            "The least populated class has fewer than 2 members; cannot stratify"
        );
    }

    if n_test > n - by_class.len() {
        anyhow::bail!(
            "test_size {} leaves no training rows for some class ({} rows, {} classes)",
            test_size,
            n,
            by_class.len()
        );
    }

    let test_counts = allocate(&by_class, n_test, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for ((_, rows), &k) in by_class.iter().zip(test_counts.iter()) {
        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut rng);
        test.extend_from_slice(&shuffled[..k]);
        train.extend_from_slice(&shuffled[k..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(SplitIndices { train, test })
}

/// Proportional per-class allocation of `total` seats
fn allocate(by_class: &BTreeMap<i32, Vec<usize>>, total: usize, n: usize) -> Vec<usize> {
    let exact: Vec<f64> = by_class
        .values()
        .map(|rows| rows.len() as f64 * total as f64 / n as f64)
        .collect();

    let mut counts: Vec<usize> = exact.iter().map(|x| x.floor() as usize).collect();
    let mut remaining = total - counts.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    for &i in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        let class_size = by_class.values().nth(i).map(|r| r.len()).unwrap_or(0);
        // Keep at least one row of every class on the training side
        if counts[i] + 1 < class_size {
            counts[i] += 1;
            remaining -= 1;
        }
    }

    counts
}

fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = rows.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("idx".into(), idx);
    Ok(df.take(&idx)?)
}

/// Pick the target values at the given rows
pub fn take_target(target: &[i32], rows: &[usize]) -> Vec<i32> {
    rows.iter().map(|&i| target[i]).collect()
}
