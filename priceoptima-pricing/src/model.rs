use crate::features::FeatureVector;

/// Regression model predicting demand for a single feature vector.
pub trait DemandModel: Send + Sync {
    /// Predict demand for one offer
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Feature names the model was fitted on, when the artifact records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Short model identifier for diagnostics
    fn kind(&self) -> &str;
}

/// Model-related errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite value: {0}")]
    NonFiniteOutput(f64),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Ordinary least-squares model: `intercept + sum(coefficient * feature)`.
#[derive(Debug, Clone)]
pub struct LinearDemandModel {
    feature_names: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearDemandModel {
    pub fn new(
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if feature_names.len() != coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: feature_names.len(),
                actual: coefficients.len(),
            });
        }
        Ok(Self {
            feature_names,
            intercept,
            coefficients,
        })
    }
}

impl DemandModel for LinearDemandModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let y = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();

        if !y.is_finite() {
            return Err(ModelError::NonFiniteOutput(y));
        }
        Ok(y)
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }

    fn kind(&self) -> &str {
        "linear"
    }
}
