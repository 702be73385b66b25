use std::sync::Arc;
use std::time::Duration;
use priceoptima_pricing::PricingService;

#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingService>,
    /// Upper bound on a single model invocation
    pub inference_timeout: Duration,
}

impl AppState {
    pub fn new(pricing: Arc<PricingService>, inference_timeout: Duration) -> Self {
        Self { pricing, inference_timeout }
    }
}
