use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use priceoptima_pricing::{BusinessInput, PricingDecision, Seasonality};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    /// Cost price of the product
    pub cost: f64,
    /// Expected demand / units sold
    pub demand: f64,
    /// Current stock level
    pub inventory: i64,
    pub competitor_price: f64,
    /// 0 = off-season, 1 = peak season
    pub seasonality: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOutput {
    pub predicted_demand: f64,
    pub recommended_price: f64,
    pub pricing_strategy: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub kind: String,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    /// Schema features filled from the request; the rest are sent as zero
    pub derived_features: Vec<String>,
}

impl PricingInput {
    pub fn validate(&self) -> Result<BusinessInput, AppError> {
        let seasonality = Seasonality::from_flag(self.seasonality).ok_or_else(|| {
            AppError::ValidationError(format!(
                "seasonality must be 0 (off-season) or 1 (peak season), got {}",
                self.seasonality
            ))
        })?;

        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(AppError::ValidationError(format!(
                "cost must be a positive number, got {}",
                self.cost
            )));
        }
        if !(self.competitor_price.is_finite() && self.competitor_price > 0.0) {
            return Err(AppError::ValidationError(format!(
                "competitor_price must be a positive number, got {}",
                self.competitor_price
            )));
        }
        if !(self.demand.is_finite() && self.demand >= 0.0) {
            return Err(AppError::ValidationError(format!(
                "demand must be a non-negative number, got {}",
                self.demand
            )));
        }
        let inventory_level = u64::try_from(self.inventory).map_err(|_| {
            AppError::ValidationError(format!(
                "inventory must be non-negative, got {}",
                self.inventory
            ))
        })?;

        Ok(BusinessInput {
            cost: self.cost,
            demand_signal: self.demand,
            inventory_level,
            competitor_price: self.competitor_price,
            seasonality,
        })
    }
}

impl From<PricingDecision> for PricingOutput {
    fn from(decision: PricingDecision) -> Self {
        Self {
            predicted_demand: decision.predicted_demand,
            recommended_price: decision.recommended_price,
            pricing_strategy: decision.strategy.to_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/model", get(model_info))
        .route("/predict-price", post(predict_price))
}

/// GET /
async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "PriceOptima API is running successfully".to_string(),
    })
}

/// GET /model
/// Describe the loaded model and which features are derived from requests
async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let pricing = &state.pricing;
    Json(ModelInfoResponse {
        kind: pricing.model_kind().to_string(),
        feature_count: pricing.schema().len(),
        feature_names: pricing.schema().names().to_vec(),
        derived_features: pricing
            .mapper()
            .matched_features()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// POST /predict-price
/// Predict demand for the offer and recommend a price
async fn predict_price(
    State(state): State<AppState>,
    Json(req): Json<PricingInput>,
) -> Result<Json<PricingOutput>, AppError> {
    let input = req.validate()?;

    // Model evaluation is synchronous; keep it off the async workers.
    let pricing = state.pricing.clone();
    let task = tokio::task::spawn_blocking(move || pricing.quote(&input));

    let decision = match tokio::time::timeout(state.inference_timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => {
            return Err(AppError::PredictionError(format!(
                "inference task failed: {}",
                join_err
            )))
        }
        Err(_) => {
            return Err(AppError::PredictionError(format!(
                "model did not respond within {} ms",
                state.inference_timeout.as_millis()
            )))
        }
    };

    Ok(Json(decision.into()))
}
