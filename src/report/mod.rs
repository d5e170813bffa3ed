//! Report module - summarizing training results

pub mod summary;

pub use summary::*;
