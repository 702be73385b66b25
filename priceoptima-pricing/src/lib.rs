pub mod features;
pub mod model;
pub mod policy;
pub mod service;

pub use features::{BusinessInput, FeatureMapper, FeatureSchema, FeatureVector, Seasonality};
pub use model::{DemandModel, LinearDemandModel, ModelError};
pub use policy::{PricingDecision, PricingEngine, PricingPolicy, Strategy};
pub use service::PricingService;

/// Fixed markup applied to cost to obtain the rule-based baseline price.
pub const BASELINE_MARKUP: f64 = 1.4;

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Invalid cost: {0} (must be strictly positive)")]
    InvalidCost(f64),
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

pub type PricingResult<T> = Result<T, PricingError>;
