//! Benchmark of preprocessing fit/transform and logistic regression training
//!
//! Run with: cargo bench --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use credrisk::pipeline::{FeatureSchema, FittedPreprocessor, LogisticRegression, RiskPipeline};

/// Generate an applicant-like table: a few numeric columns, a few
/// low-cardinality categoricals with some nulls, and a noisy target
fn generate_applicants(n_rows: usize, seed: u64) -> (DataFrame, Vec<i32>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let income: Vec<f64> = (0..n_rows).map(|_| 30_000.0 + rng.gen::<f64>() * 300_000.0).collect();
    let days_birth: Vec<i64> = (0..n_rows).map(|_| -rng.gen_range(7_000..25_000)).collect();
    let days_employed: Vec<i64> = (0..n_rows).map(|_| -rng.gen_range(0..15_000)).collect();
    let children: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..4)).collect();

    let income_types = ["Working", "Commercial associate", "Pensioner", "State servant"];
    let housing = ["House / apartment", "With parents", "Rented apartment"];
    let occupations = ["Laborers", "Sales staff", "Managers", "Drivers", "Core staff"];

    let income_type: Vec<&str> = (0..n_rows)
        .map(|_| income_types[rng.gen_range(0..income_types.len())])
        .collect();
    let housing_type: Vec<&str> = (0..n_rows)
        .map(|_| housing[rng.gen_range(0..housing.len())])
        .collect();
    let occupation: Vec<Option<&str>> = (0..n_rows)
        .map(|_| {
            if rng.gen::<f64>() < 0.3 {
                None
            } else {
                Some(occupations[rng.gen_range(0..occupations.len())])
            }
        })
        .collect();

    // Lower income raises the bad-client odds
    let target: Vec<i32> = income
        .iter()
        .map(|&inc| {
            let p = 1.0 / (1.0 + ((inc - 80_000.0) / 30_000.0).exp());
            i32::from(rng.gen::<f64>() < p)
        })
        .collect();

    let df = df! {
        "AMT_INCOME_TOTAL" => income,
        "DAYS_BIRTH" => days_birth,
        "DAYS_EMPLOYED" => days_employed,
        "CNT_CHILDREN" => children,
        "NAME_INCOME_TYPE" => income_type,
        "NAME_HOUSING_TYPE" => housing_type,
        "OCCUPATION_TYPE" => occupation,
    }
    .unwrap();

    (df, target)
}

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");

    for &n_rows in &[10_000usize, 100_000] {
        let (df, _) = generate_applicants(n_rows, 42);
        let schema = FeatureSchema::infer(&df);

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("fit_transform", n_rows), &df, |b, df| {
            b.iter(|| {
                let pre = FittedPreprocessor::fit(black_box(df), &schema).unwrap();
                black_box(pre.transform(df).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for &n_rows in &[5_000usize, 50_000] {
        let (df, target) = generate_applicants(n_rows, 7);
        let schema = FeatureSchema::infer(&df);
        let solver = LogisticRegression::default();

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("pipeline_fit", n_rows), &df, |b, df| {
            b.iter(|| black_box(RiskPipeline::fit(df, &target, &schema, &solver).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_preprocess, bench_training);
criterion_main!(benches);
