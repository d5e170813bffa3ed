//! Credrisk: Credit Risk Classification Library
//!
//! Derives a bad-client label from credit history, fits a preprocessing +
//! logistic regression pipeline on applicant attributes, persists it, and
//! serves single-applicant predictions over HTTP.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod utils;
