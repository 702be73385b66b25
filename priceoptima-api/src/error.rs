use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use priceoptima_pricing::PricingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    PredictionError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PredictionError(msg) => {
                tracing::error!("Prediction error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Prediction error: {}", msg))
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidCost(_) => AppError::ValidationError(err.to_string()),
            PricingError::PredictionFailed(msg) => AppError::PredictionError(msg),
            PricingError::SchemaMismatch(_) => AppError::Anyhow(err.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
