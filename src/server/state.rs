use std::path::Path;

use crate::pipeline::{ArtifactError, RiskPipeline};

use super::models::ClientData;

/// Model availability, decided once at startup and never changed
#[derive(Debug)]
pub enum ModelState {
    Loaded(RiskPipeline),
    Unloaded { reason: String },
}

impl ModelState {
    /// Try to load the artifact at `path` and check it against the request schema.
    ///
    /// Any failure leaves the server running without a model; the reason is
    /// logged here and kept for inspection.
    pub fn load(path: &Path) -> Self {
        match RiskPipeline::load_for(path, &ClientData::feature_schema()) {
            Ok(pipeline) => {
                tracing::info!(
                    path = %path.display(),
                    features = pipeline.schema.len(),
                    encoded_width = pipeline.encoded_width(),
                    "Model pipeline loaded"
                );
                ModelState::Loaded(pipeline)
            }
            Err(e) => {
                match &e {
                    ArtifactError::NotFound(_) => {
                        tracing::error!("Model file '{}' not found", path.display())
                    }
                    other => tracing::error!("Failed to load model pipeline: {}", other),
                }
                ModelState::Unloaded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn pipeline(&self) -> Option<&RiskPipeline> {
        match self {
            ModelState::Loaded(pipeline) => Some(pipeline),
            ModelState::Unloaded { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline().is_some()
    }
}

/// Shared application state injected into handlers.
#[derive(Debug)]
pub struct AppState {
    /// Fitted pipeline, read-only for the lifetime of the process.
    pub model: ModelState,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }
}
