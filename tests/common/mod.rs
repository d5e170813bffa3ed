//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::path::PathBuf;

use credrisk::pipeline::*;
use credrisk::server::ClientData;
use polars::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Applicant feature columns, in table order
pub const FEATURE_COLUMNS: [&str; 16] = [
    "CODE_GENDER",
    "FLAG_OWN_CAR",
    "FLAG_OWN_REALTY",
    "CNT_CHILDREN",
    "AMT_INCOME_TOTAL",
    "NAME_INCOME_TYPE",
    "NAME_EDUCATION_TYPE",
    "NAME_FAMILY_STATUS",
    "NAME_HOUSING_TYPE",
    "DAYS_BIRTH",
    "DAYS_EMPLOYED",
    "FLAG_WORK_PHONE",
    "FLAG_PHONE",
    "FLAG_EMAIL",
    "OCCUPATION_TYPE",
    "CNT_FAM_MEMBERS",
];

/// First applicant ID; applicant `i` has ID `BASE_ID + i`
pub const BASE_ID: i64 = 5_008_800;

/// Credit-history ID with no matching applicant
pub const ORPHAN_CREDIT_ID: i64 = 9_999_999;

/// Applicant `i` is a bad client in the fixtures
pub fn is_bad_fixture(i: usize) -> bool {
    i % 5 == 0
}

/// Applicant `i` has no credit history in the fixtures
pub fn has_no_history(i: usize) -> bool {
    i % 10 == 9
}

/// Create an applicant table with all 16 feature columns plus ID and FLAG_MOBIL.
///
/// Bad clients earn markedly less so a linear model can pick them out.
/// Every sixth applicant has no occupation.
pub fn create_applicants(n: usize) -> DataFrame {
    let income_types = ["Working", "Commercial associate", "Pensioner"];
    let education = ["Higher education", "Secondary / secondary special"];
    let family = ["Married", "Single / not married", "Civil marriage"];
    let housing = ["House / apartment", "With parents"];
    let occupations = ["Laborers", "Sales staff", "Managers"];

    let ids: Vec<i64> = (0..n).map(|i| BASE_ID + i as i64).collect();
    let gender: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "F" } else { "M" }).collect();
    let car: Vec<&str> = (0..n).map(|i| if i % 3 == 0 { "Y" } else { "N" }).collect();
    let realty: Vec<&str> = (0..n).map(|i| if i % 4 == 0 { "N" } else { "Y" }).collect();
    let children: Vec<i64> = (0..n).map(|i| (i % 3) as i64).collect();
    let income: Vec<f64> = (0..n)
        .map(|i| {
            if is_bad_fixture(i) {
                45_000.5 + (i % 7) as f64 * 1_000.0
            } else {
                135_000.5 + (i % 11) as f64 * 5_000.0
            }
        })
        .collect();
    let income_type: Vec<&str> = (0..n).map(|i| income_types[i % 3]).collect();
    let education_type: Vec<&str> = (0..n).map(|i| education[i % 2]).collect();
    let family_status: Vec<&str> = (0..n).map(|i| family[(i / 2) % 3]).collect();
    let housing_type: Vec<&str> = (0..n).map(|i| housing[(i / 3) % 2]).collect();
    let days_birth: Vec<i64> = (0..n).map(|i| -(9_000 + ((i * 37) % 12_000) as i64)).collect();
    let days_employed: Vec<i64> = (0..n).map(|i| -(300 + ((i * 53) % 5_000) as i64)).collect();
    let mobil: Vec<i64> = vec![1; n];
    let work_phone: Vec<i64> = (0..n).map(|i| (i % 2) as i64).collect();
    let phone: Vec<i64> = (0..n).map(|i| ((i / 3) % 2) as i64).collect();
    let email: Vec<i64> = (0..n).map(|i| i64::from(i % 7 == 0)).collect();
    let occupation: Vec<Option<&str>> = (0..n)
        .map(|i| {
            if i % 6 == 1 {
                None
            } else {
                Some(occupations[i % 3])
            }
        })
        .collect();
    let family_members: Vec<f64> = (0..n).map(|i| (1 + i % 4) as f64).collect();

    df! {
        "ID" => ids,
        "CODE_GENDER" => gender,
        "FLAG_OWN_CAR" => car,
        "FLAG_OWN_REALTY" => realty,
        "CNT_CHILDREN" => children,
        "AMT_INCOME_TOTAL" => income,
        "NAME_INCOME_TYPE" => income_type,
        "NAME_EDUCATION_TYPE" => education_type,
        "NAME_FAMILY_STATUS" => family_status,
        "NAME_HOUSING_TYPE" => housing_type,
        "DAYS_BIRTH" => days_birth,
        "DAYS_EMPLOYED" => days_employed,
        "FLAG_MOBIL" => mobil,
        "FLAG_WORK_PHONE" => work_phone,
        "FLAG_PHONE" => phone,
        "FLAG_EMAIL" => email,
        "OCCUPATION_TYPE" => occupation,
        "CNT_FAM_MEMBERS" => family_members,
    }
    .unwrap()
}

/// Create the monthly credit history matching `create_applicants(n)`.
///
/// Bad clients hit a 60+ day status in one month only; good clients never
/// do. One extra ID has history but no applicant row.
pub fn create_credit_records(n: usize) -> DataFrame {
    let mut ids: Vec<i64> = Vec::new();
    let mut months: Vec<i64> = Vec::new();
    let mut statuses: Vec<&str> = Vec::new();

    for i in (0..n).filter(|&i| !has_no_history(i)) {
        let history: [&str; 3] = if is_bad_fixture(i) {
            ["0", ["2", "3", "4", "5"][i % 4], "C"]
        } else {
            ["X", "0", if i % 2 == 0 { "1" } else { "C" }]
        };
        for (month, status) in history.into_iter().enumerate() {
            ids.push(BASE_ID + i as i64);
            months.push(-(month as i64));
            statuses.push(status);
        }
    }

    ids.push(ORPHAN_CREDIT_ID);
    months.push(0);
    statuses.push("5");

    df! {
        "ID" => ids,
        "MONTHS_BALANCE" => months,
        "STATUS" => statuses,
    }
    .unwrap()
}

/// Number of applicants with a credit history in `create_applicants(n)`
pub fn matched_count(n: usize) -> usize {
    (0..n).filter(|&i| !has_no_history(i)).count()
}

/// Number of bad clients among the matched applicants
pub fn matched_bad_count(n: usize) -> usize {
    (0..n)
        .filter(|&i| !has_no_history(i) && is_bad_fixture(i))
        .count()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write both training tables as CSV into one temporary directory.
///
/// Returns (temp_dir, applications_path, credit_records_path)
pub fn create_training_csvs(n: usize) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let applications = temp_dir.path().join("application_record.csv");
    let credit_records = temp_dir.path().join("credit_record.csv");

    let mut file = std::fs::File::create(&applications).unwrap();
    CsvWriter::new(&mut file)
        .finish(&mut create_applicants(n))
        .unwrap();

    let mut file = std::fs::File::create(&credit_records).unwrap();
    CsvWriter::new(&mut file)
        .finish(&mut create_credit_records(n))
        .unwrap();

    (temp_dir, applications, credit_records)
}

/// Build the in-memory training set for `n` fixture applicants
pub fn create_training_set(n: usize) -> TrainingSet {
    let labels = derive_labels(&create_credit_records(n)).unwrap();
    assemble_training_set(&create_applicants(n), &labels).unwrap()
}

/// Fit a pipeline on all fixture rows with default solver settings
pub fn fit_fixture_pipeline(n: usize) -> RiskPipeline {
    let training = create_training_set(n);
    let (pipeline, _stats) = RiskPipeline::fit(
        &training.features,
        &training.target,
        &training.schema,
        &LogisticRegression::default(),
    )
    .unwrap();
    pipeline
}

/// A well-formed applicant payload
pub fn sample_client() -> ClientData {
    ClientData {
        code_gender: "F".into(),
        flag_own_car: "N".into(),
        flag_own_realty: "Y".into(),
        cnt_children: 0,
        amt_income_total: 157_500.0,
        name_income_type: "Working".into(),
        name_education_type: "Higher education".into(),
        name_family_status: "Married".into(),
        name_housing_type: "House / apartment".into(),
        days_birth: -12_005,
        days_employed: -4_542,
        flag_work_phone: 0,
        flag_phone: 1,
        flag_email: 0,
        occupation_type: "Managers".into(),
        cnt_fam_members: 2.0,
    }
}

/// The same payload as sent over the wire
pub fn sample_client_json() -> Value {
    json!({
        "CODE_GENDER": "F",
        "FLAG_OWN_CAR": "N",
        "FLAG_OWN_REALTY": "Y",
        "CNT_CHILDREN": 0,
        "AMT_INCOME_TOTAL": 157500.0,
        "NAME_INCOME_TYPE": "Working",
        "NAME_EDUCATION_TYPE": "Higher education",
        "NAME_FAMILY_STATUS": "Married",
        "NAME_HOUSING_TYPE": "House / apartment",
        "DAYS_BIRTH": -12005,
        "DAYS_EMPLOYED": -4542,
        "FLAG_WORK_PHONE": 0,
        "FLAG_PHONE": 1,
        "FLAG_EMAIL": 0,
        "OCCUPATION_TYPE": "Managers",
        "CNT_FAM_MEMBERS": 2.0
    })
}
