use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use priceoptima_pricing::{DemandModel, FeatureSchema, LinearDemandModel, PricingError};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// On-disk model artifact, tagged by model family.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    },
}

impl ModelArtifact {
    pub fn into_model(self) -> Result<Arc<dyn DemandModel>, String> {
        match self {
            ModelArtifact::Linear {
                feature_names,
                intercept,
                coefficients,
            } => {
                let model = LinearDemandModel::new(feature_names, intercept, coefficients)
                    .map_err(|e| e.to_string())?;
                Ok(Arc::new(model))
            }
        }
    }
}

/// Feature schema and model loaded together at startup.
pub struct LoadedModel {
    pub schema: FeatureSchema,
    pub model: Arc<dyn DemandModel>,
}

/// Reads the feature schema and model artifact from disk.
pub struct ModelRepository {
    schema_path: PathBuf,
    artifact_path: PathBuf,
}

impl ModelRepository {
    pub fn new(schema_path: impl Into<PathBuf>, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            artifact_path: artifact_path.into(),
        }
    }

    pub fn load_schema(&self) -> Result<FeatureSchema, ArtifactError> {
        let names: Vec<String> = read_json(&self.schema_path)?;
        FeatureSchema::new(names).map_err(|e| match e {
            PricingError::SchemaMismatch(reason) => invalid(&self.schema_path, reason),
            other => invalid(&self.schema_path, other.to_string()),
        })
    }

    pub fn load_model(&self) -> Result<Arc<dyn DemandModel>, ArtifactError> {
        let artifact: ModelArtifact = read_json(&self.artifact_path)?;
        artifact
            .into_model()
            .map_err(|reason| invalid(&self.artifact_path, reason))
    }

    pub fn load(&self) -> Result<LoadedModel, ArtifactError> {
        let schema = self.load_schema()?;
        tracing::info!(
            "Loaded feature schema with {} features from {}",
            schema.len(),
            self.schema_path.display()
        );

        let model = self.load_model()?;
        tracing::info!(
            "Loaded {} model from {}",
            model.kind(),
            self.artifact_path.display()
        );

        Ok(LoadedModel { schema, model })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}
