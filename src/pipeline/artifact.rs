//! Artifact persistence for the fitted pipeline

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{RiskPipeline, ARTIFACT_FORMAT};
use super::schema::FeatureSchema;

/// Default artifact filename shared by the training job and the server
pub const DEFAULT_ARTIFACT_PATH: &str = "modelo_risco_pipeline.json";

/// Failures when reading or writing a pipeline artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact '{0}' not found")]
    NotFound(PathBuf),

    #[error("failed to access artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode artifact: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("artifact format {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("artifact schema does not match the request schema: {}", .0.join("; "))]
    SchemaMismatch(Vec<String>),
}

impl RiskPipeline {
    /// Write the pipeline as JSON to `path`
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let json = serde_json::to_string_pretty(self).map_err(ArtifactError::Encode)?;
        std::fs::write(path, json).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a pipeline written by `save`
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(path.to_path_buf())
            } else {
                ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let pipeline: RiskPipeline =
            serde_json::from_str(&json).map_err(|source| ArtifactError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        if pipeline.format != ARTIFACT_FORMAT {
            return Err(ArtifactError::UnsupportedFormat {
                found: pipeline.format,
                expected: ARTIFACT_FORMAT,
            });
        }

        Ok(pipeline)
    }

    /// Load and check that inputs shaped like `provided` can feed the pipeline
    pub fn load_for(path: &Path, provided: &FeatureSchema) -> Result<Self, ArtifactError> {
        let pipeline = Self::load(path)?;
        let problems = pipeline.schema.incompatibilities(provided);
        if !problems.is_empty() {
            return Err(ArtifactError::SchemaMismatch(problems));
        }
        Ok(pipeline)
    }
}
