use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PricingError, PricingResult, BASELINE_MARKUP};

/// Pricing tier selected from predicted demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Premium,
    Discount,
    Standard,
}

impl Strategy {
    /// Multiplier applied on top of the baseline price
    pub fn multiplier(self) -> f64 {
        match self {
            Strategy::Premium => 1.10,
            Strategy::Discount => 0.95,
            Strategy::Standard => 1.05,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Premium => "premium",
            Strategy::Discount => "discount",
            Strategy::Standard => "standard",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PricingPolicy {
    /// Demand strictly above this selects the premium tier
    pub high_demand_threshold: f64,

    /// Demand strictly below this selects the discount tier
    pub low_demand_threshold: f64,

    /// Markup over cost giving the baseline price
    pub baseline_markup: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            high_demand_threshold: 50.0,
            low_demand_threshold: 20.0,
            baseline_markup: BASELINE_MARKUP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingDecision {
    pub predicted_demand: f64,
    pub recommended_price: f64,
    pub strategy: Strategy,
}

/// Tiered demand-based pricing
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn ensure_valid_cost(&self, cost: f64) -> PricingResult<()> {
        // NaN fails this comparison too.
        if cost > 0.0 && cost.is_finite() {
            Ok(())
        } else {
            Err(PricingError::InvalidCost(cost))
        }
    }

    /// First match wins: premium, then discount, otherwise standard.
    pub fn select_strategy(&self, predicted_demand: f64) -> Strategy {
        if predicted_demand > self.policy.high_demand_threshold {
            Strategy::Premium
        } else if predicted_demand < self.policy.low_demand_threshold {
            Strategy::Discount
        } else {
            Strategy::Standard
        }
    }

    pub fn baseline_price(&self, cost: f64) -> f64 {
        cost * self.policy.baseline_markup
    }

    pub fn decide(&self, predicted_demand: f64, cost: f64) -> PricingResult<PricingDecision> {
        self.ensure_valid_cost(cost)?;

        let strategy = self.select_strategy(predicted_demand);
        let price = self.baseline_price(cost) * strategy.multiplier();
        if !price.is_finite() {
            return Err(PricingError::InvalidCost(cost));
        }

        Ok(PricingDecision {
            predicted_demand: round_to_cents(predicted_demand),
            recommended_price: round_to_cents(price),
            strategy,
        })
    }
}

/// Magnitude past which an `f64` no longer carries sub-cent precision.
const CENT_PRECISION_LIMIT: f64 = 1e15;

/// Round to two decimal places, half to even on the exact binary value.
///
/// Float formatting rounds the exact value, so `2.675` (stored just below)
/// becomes `2.67` and the true tie `0.125` becomes `0.12`.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= CENT_PRECISION_LIMIT {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}
