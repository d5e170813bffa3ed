//! Pipeline module - data loading, labelling, preprocessing and model fitting

pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod loader;
pub mod model;
pub mod preprocess;
pub mod schema;
pub mod split;
pub mod target;

pub use artifact::*;
pub use classifier::*;
pub use dataset::*;
pub use loader::*;
pub use model::*;
pub use preprocess::*;
pub use schema::*;
pub use split::*;
pub use target::*;
