//! CLI module - argument parsing for the training job

mod args;

pub use args::Cli;
