pub mod app_config;
pub mod model_repo;

pub use app_config::Config;
pub use model_repo::{ArtifactError, LoadedModel, ModelArtifact, ModelRepository};
