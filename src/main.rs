//! Credrisk: Credit Risk Training CLI
//!
//! Loads the applicant and credit-history tables, derives the bad-client
//! target, fits the preprocessing + logistic regression pipeline, reports
//! holdout accuracy and saves the fitted pipeline for the prediction server.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credrisk::cli::Cli;
use credrisk::pipeline::{
    assemble_training_set, count_labels, derive_labels, load_training_inputs, stratified_split,
    take_target, LogisticRegression, RiskPipeline,
};
use credrisk::report::TrainingSummary;
use credrisk::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console output carries the progress; tracing only surfaces warnings
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credrisk=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli);

    let mut summary = TrainingSummary::new();

    // Step 1: Load both tables before doing any work
    print_step_header(1, "Load Data");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading applicant and credit history tables...");
    let (applicants, credit) = match load_training_inputs(
        &cli.applications,
        &cli.credit_records,
        cli.infer_schema_length,
    ) {
        Ok(tables) => tables,
        Err(e) => {
            finish_with_warning(&spinner, "Could not read the input data");
            return Err(e);
        }
    };
    finish_with_success(&spinner, "Datasets loaded");

    summary.applicants = applicants.height();
    summary.credit_records = credit.height();
    println!(
        "      Applicants: {}  |  Credit history rows: {}",
        style(applicants.height()).yellow(),
        style(credit.height()).yellow()
    );
    let elapsed = step_start.elapsed();
    summary.record_step("Load data", elapsed);
    print_step_time(elapsed);

    // Step 2: Target derivation
    print_step_header(2, "Derive Target");
    let step_start = Instant::now();
    let labels = derive_labels(&credit)?;
    let (bad, good) = count_labels(&labels)?;
    summary.labelled_clients = bad + good;
    summary.bad_clients = bad;
    print_count(
        "client(s) ever 60+ days past due",
        bad,
        Some(&format!("(of {} with history)", bad + good)),
    );
    let elapsed = step_start.elapsed();
    summary.record_step("Derive target", elapsed);
    print_step_time(elapsed);

    // Step 3: Join applicants with their labels
    print_step_header(3, "Assemble Training Set");
    let step_start = Instant::now();
    let training = assemble_training_set(&applicants, &labels)?;
    summary.training_rows = training.len();
    summary.training_bad_rate = training.bad_rate();
    summary.unmatched_applicants = training.unmatched_applicants;
    print_success(&format!("{} applicant(s) matched a credit history", training.len()));
    if training.unmatched_applicants > 0 {
        print_info(&format!(
            "{} applicant(s) without credit history were left out",
            training.unmatched_applicants
        ));
    }
    let elapsed = step_start.elapsed();
    summary.record_step("Assemble training set", elapsed);
    print_step_time(elapsed);

    // Step 4: Preprocessing layout from the inferred column types
    print_step_header(4, "Define Preprocessing");
    let numeric: Vec<&str> = training.schema.numeric().map(|f| f.name.as_str()).collect();
    let categorical: Vec<&str> = training
        .schema
        .categorical()
        .map(|f| f.name.as_str())
        .collect();
    summary.numeric_features = numeric.len();
    summary.categorical_features = categorical.len();
    print_count("numeric feature(s)", numeric.len(), Some("(median + standard scaling)"));
    print_count(
        "categorical feature(s)",
        categorical.len(),
        Some("(constant fill + one-hot)"),
    );

    // Step 5: Stratified split and fit
    print_step_header(5, "Train Model");
    let step_start = Instant::now();
    let split = stratified_split(&training.target, cli.test_size, cli.seed)?;
    let train_x = split.take_train(&training.features)?;
    let test_x = split.take_test(&training.features)?;
    let train_y = take_target(&training.target, &split.train);
    let test_y = take_target(&training.target, &split.test);
    summary.train_rows = train_y.len();
    summary.test_rows = test_y.len();

    let solver = LogisticRegression {
        c: cli.c,
        max_iter: cli.max_iter,
        class_weight: cli.class_weight,
        ..Default::default()
    };

    let spinner = create_spinner("Fitting preprocessing and logistic regression...");
    let (pipeline, stats) = RiskPipeline::fit(&train_x, &train_y, &training.schema, &solver)?;
    summary.iterations = stats.iterations;
    summary.converged = stats.converged;
    summary.objective = stats.objective;
    summary.encoded_width = pipeline.encoded_width();
    if stats.converged {
        finish_with_success(
            &spinner,
            &format!("Model trained in {} iteration(s)", stats.iterations),
        );
    } else {
        finish_with_warning(
            &spinner,
            &format!("Stopped after {} iteration(s) without converging", stats.iterations),
        );
    }
    let elapsed = step_start.elapsed();
    summary.record_step("Train model", elapsed);
    print_step_time(elapsed);

    // Step 6: Holdout accuracy
    print_step_header(6, "Evaluate");
    let step_start = Instant::now();
    let accuracy = pipeline.score(&test_x, &test_y)?;
    summary.accuracy = accuracy;
    println!(
        "      Test set accuracy: {}",
        style(format!("{:.2}", accuracy)).yellow().bold()
    );
    print_warning("Accuracy alone is a weak measure on imbalanced classes");
    let elapsed = step_start.elapsed();
    summary.record_step("Evaluate", elapsed);
    print_step_time(elapsed);

    // Step 7: Persist the fitted pipeline
    print_step_header(7, "Save Pipeline");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing pipeline artifact...");
    pipeline
        .save(&cli.output)
        .with_context(|| format!("Failed to save pipeline to {}", cli.output.display()))?;
    finish_with_success(&spinner, &format!("Saved to {}", cli.output.display()));
    let elapsed = step_start.elapsed();
    summary.record_step("Save pipeline", elapsed);
    print_step_time(elapsed);

    summary.finish();
    summary.display();
    print_completion();

    Ok(())
}
