use std::sync::Arc;

use crate::{PricingError, PricingResult, BASELINE_MARKUP};

/// Calendar month used as a stand-in when the offer is in peak season.
pub const PEAK_SEASON_MONTH: f64 = 11.0;
/// Calendar month used as a stand-in outside peak season.
pub const OFF_SEASON_MONTH: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seasonality {
    OffSeason,
    PeakSeason,
}

impl Seasonality {
    /// Decode the wire flag (`0` = off-season, `1` = peak season).
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Seasonality::OffSeason),
            1 => Some(Seasonality::PeakSeason),
            _ => None,
        }
    }

    pub fn is_peak(self) -> bool {
        self == Seasonality::PeakSeason
    }
}

/// Business attributes of a single product offer, already validated by the caller.
#[derive(Debug, Clone)]
pub struct BusinessInput {
    /// Cost price of the product
    pub cost: f64,

    /// Recent units sold, used as a proxy for expected demand
    pub demand_signal: f64,

    /// Current stock level
    pub inventory_level: u64,

    /// Competitor's price for the same product
    pub competitor_price: f64,

    pub seasonality: Seasonality,
}

/// Ordered list of feature names the loaded model was trained on.
///
/// Cloning is cheap; the names are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Arc<[String]>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> PricingResult<Self> {
        if names.is_empty() {
            return Err(PricingError::SchemaMismatch(
                "feature schema is empty".to_string(),
            ));
        }

        Ok(Self { names: names.into() })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Feature values laid out in schema order. A name listed more than once in
/// the schema holds the same value at every position.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    fn zeroed(schema: &FeatureSchema) -> Self {
        Self {
            schema: schema.clone(),
            values: vec![0.0; schema.len()],
        }
    }

    pub fn names(&self) -> &[String] {
        self.schema.names()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// How a known model feature is derived from the business input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    CostPrice,
    StockLevel,
    CompetitorPrice,
    RuleBasedPrice,
    Weekend,
    Month,
    MonthEnd,
    LagDemand,
}

impl Derivation {
    pub fn apply(self, input: &BusinessInput) -> f64 {
        match self {
            Derivation::CostPrice => input.cost,
            Derivation::StockLevel => input.inventory_level as f64,
            Derivation::CompetitorPrice => input.competitor_price,
            Derivation::RuleBasedPrice => input.cost * BASELINE_MARKUP,
            // No calendar context is available at request time.
            Derivation::Weekend | Derivation::MonthEnd => 0.0,
            Derivation::Month => {
                if input.seasonality.is_peak() {
                    PEAK_SEASON_MONTH
                } else {
                    OFF_SEASON_MONTH
                }
            }
            Derivation::LagDemand => input.demand_signal,
        }
    }
}

/// Feature names the mapper knows how to fill, keyed by the spelling used in
/// the training data.
pub const KNOWN_FEATURES: &[(&str, Derivation)] = &[
    ("Cost Price", Derivation::CostPrice),
    ("Stock Level", Derivation::StockLevel),
    ("Competitor Price", Derivation::CompetitorPrice),
    ("rule_price", Derivation::RuleBasedPrice),
    ("is_weekend", Derivation::Weekend),
    ("month", Derivation::Month),
    ("is_month_end", Derivation::MonthEnd),
    ("units_sold_lag_1", Derivation::LagDemand),
];

/// Maps business inputs onto the model's feature vector.
///
/// The known-feature table is resolved against the schema once, at
/// construction. Known features missing from the schema are skipped, schema
/// names without a derivation stay at zero, and repeated names are all filled.
#[derive(Debug, Clone)]
pub struct FeatureMapper {
    schema: FeatureSchema,
    plan: Vec<(usize, Derivation)>,
}

impl FeatureMapper {
    pub fn new(schema: FeatureSchema) -> Self {
        let plan = schema
            .names()
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                KNOWN_FEATURES
                    .iter()
                    .find(|(known, _)| *known == name.as_str())
                    .map(|(_, derivation)| (idx, *derivation))
            })
            .collect();

        Self { schema, plan }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Names of schema features that have a derivation rule, in schema order.
    pub fn matched_features(&self) -> Vec<&str> {
        self.plan
            .iter()
            .map(|(idx, _)| self.schema.names()[*idx].as_str())
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.plan.len()
    }

    pub fn map(&self, input: &BusinessInput) -> FeatureVector {
        let mut vector = FeatureVector::zeroed(&self.schema);
        for (idx, derivation) in &self.plan {
            vector.values[*idx] = derivation.apply(input);
        }
        vector
    }
}
