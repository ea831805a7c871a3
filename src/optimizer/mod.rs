pub mod engine;
pub mod filter;
pub mod insights;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::{RegionalPrices, VehicleClass, VehicleTable};
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::optimizer::insights::ResultInsights;

pub use engine::ProfitOptimizer;

pub const DEFAULT_HANDLING_RATE: f64 = 150.0;
pub const DEFAULT_DEMAND_SCORE: f64 = 50.0;

/// A mandi or other collection point that buys produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default = "default_open")]
    pub is_open: bool,
    /// Price per quintal keyed by commodity name.
    #[serde(default)]
    pub crop_prices: BTreeMap<String, f64>,
    /// Handling charge per quintal.
    #[serde(default)]
    pub handling_rate: Option<f64>,
    #[serde(default)]
    pub demand_score: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Destination {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: Some(location),
            is_open: true,
            crop_prices: BTreeMap::new(),
            handling_rate: None,
            demand_score: None,
            phone: None,
            city: None,
            state: None,
        }
    }

    pub fn with_price(mut self, commodity: impl Into<String>, price: f64) -> Self {
        self.crop_prices.insert(commodity.into(), price);
        self
    }

    pub fn with_handling_rate(mut self, rate: f64) -> Self {
        self.handling_rate = Some(rate);
        self
    }

    pub fn with_demand_score(mut self, score: f64) -> Self {
        self.demand_score = Some(score);
        self
    }

    pub fn closed(mut self) -> Self {
        self.is_open = false;
        self
    }

    pub fn price_for(&self, commodity: &str) -> Option<f64> {
        self.crop_prices.get(commodity).copied()
    }
}

fn default_open() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub origin: Coordinate,
    pub commodity: String,
    /// Quintals.
    pub quantity: f64,
    pub vehicle: VehicleClass,
    #[serde(default)]
    pub region: Option<String>,
}

impl OptimizationRequest {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(EngineError::InvalidQuantity(self.quantity));
        }
        if self.commodity.trim().is_empty() {
            return Err(EngineError::EmptyCommodity);
        }
        self.origin.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub rank: usize,
    pub destination_id: String,
    pub destination_name: String,
    pub location: Coordinate,
    pub distance_km: f64,
    pub unit_price: f64,
    pub revenue: i64,
    pub transport_cost: i64,
    pub handling_cost: i64,
    pub net_profit: i64,
    pub handling_rate: f64,
    pub fuel_price: f64,
    pub is_open: bool,
    pub demand_score: f64,
    pub phone: Option<String>,
    pub insights: ResultInsights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub best: Option<OptimizationResult>,
    pub results: Vec<OptimizationResult>,
}

impl OptimizationSummary {
    pub fn from_results(results: Vec<OptimizationResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            count: results.len(),
            best: results.first().cloned(),
            results,
        }
    }

    pub fn truncated(mut self, top: usize) -> Self {
        self.results.truncate(top.max(1));
        self
    }
}

/// Fallback constants and lookup tables the engine is built with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub default_handling_rate: f64,
    pub default_demand_score: f64,
    pub regional_prices: RegionalPrices,
    pub vehicles: VehicleTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_handling_rate: DEFAULT_HANDLING_RATE,
            default_demand_score: DEFAULT_DEMAND_SCORE,
            regional_prices: RegionalPrices::with_defaults(),
            vehicles: VehicleTable::with_defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OptimizationRequest {
        OptimizationRequest {
            origin: Coordinate::new(28.70, 77.10),
            commodity: "wheat".to_string(),
            quantity: 10.0,
            vehicle: VehicleClass::MiniTruck,
            region: None,
        }
    }

    #[test]
    fn rejects_non_positive_or_nan_quantity() {
        for quantity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut req = request();
            req.quantity = quantity;
            assert!(matches!(req.validate(), Err(EngineError::InvalidQuantity(_))));
        }
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_blank_commodity_and_bad_origin() {
        let mut req = request();
        req.commodity = "  ".to_string();
        assert_eq!(req.validate(), Err(EngineError::EmptyCommodity));

        let mut req = request();
        req.origin = Coordinate::new(95.0, 77.0);
        assert!(matches!(req.validate(), Err(EngineError::InvalidCoordinate { .. })));
    }

    #[test]
    fn destination_deserializes_with_defaults() {
        let json = r#"{
            "id": "DL-AZP-001",
            "name": "Azadpur Mandi",
            "location": { "lat": 28.7204, "lng": 77.1651 },
            "crop_prices": { "wheat": 2150 }
        }"#;
        let dest: Destination = serde_json::from_str(json).expect("valid destination");
        assert!(dest.is_open);
        assert_eq!(dest.price_for("wheat"), Some(2150.0));
        assert_eq!(dest.price_for("rice"), None);
        assert!(dest.handling_rate.is_none());
    }
}
