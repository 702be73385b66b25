use std::sync::Arc;

use crate::features::{BusinessInput, FeatureMapper, FeatureSchema};
use crate::model::DemandModel;
use crate::policy::{PricingDecision, PricingEngine, PricingPolicy};
use crate::{PricingError, PricingResult};

/// Feature mapping, demand prediction and pricing policy bound to one loaded
/// model. Built once at startup and shared read-only between requests.
pub struct PricingService {
    mapper: FeatureMapper,
    model: Arc<dyn DemandModel>,
    engine: PricingEngine,
}

impl PricingService {
    pub fn new(
        schema: FeatureSchema,
        model: Arc<dyn DemandModel>,
        policy: PricingPolicy,
    ) -> PricingResult<Self> {
        if let Some(model_names) = model.feature_names() {
            if model_names != schema.names() {
                return Err(PricingError::SchemaMismatch(format!(
                    "model expects {} features {:?}, schema lists {} features {:?}",
                    model_names.len(),
                    model_names,
                    schema.len(),
                    schema.names()
                )));
            }
        }

        let mapper = FeatureMapper::new(schema);
        if mapper.matched_count() == 0 {
            tracing::warn!(
                "None of the known features appear in the schema; every prediction will see an all-zero vector"
            );
        }

        tracing::info!(
            "Pricing service ready: {} model, {} features ({} derived from inputs)",
            model.kind(),
            mapper.schema().len(),
            mapper.matched_count()
        );

        Ok(Self {
            mapper,
            model,
            engine: PricingEngine::new(policy),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.mapper.schema()
    }

    pub fn mapper(&self) -> &FeatureMapper {
        &self.mapper
    }

    pub fn model_kind(&self) -> &str {
        self.model.kind()
    }

    /// Run the model once; any model failure is reported as `PredictionFailed`.
    pub fn predict_demand(&self, input: &BusinessInput) -> PricingResult<f64> {
        let features = self.mapper.map(input);
        let demand = self
            .model
            .predict(&features)
            .map_err(|e| PricingError::PredictionFailed(e.to_string()))?;

        if !demand.is_finite() {
            return Err(PricingError::PredictionFailed(format!(
                "model returned non-finite demand {}",
                demand
            )));
        }
        Ok(demand)
    }

    pub fn quote(&self, input: &BusinessInput) -> PricingResult<PricingDecision> {
        self.engine.ensure_valid_cost(input.cost)?;

        let demand = self.predict_demand(input)?;
        let decision = self.engine.decide(demand, input.cost)?;

        tracing::debug!(
            "Quoted cost={} demand={:.2} -> {} at {}",
            input.cost,
            demand,
            decision.strategy,
            decision.recommended_price
        );
        Ok(decision)
    }
}
