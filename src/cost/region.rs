use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key of the entry used whenever a region is absent or unknown.
pub const DEFAULT_REGION: &str = "default";

const DEFAULT_FUEL_PRICE: f64 = 100.00;

// Approximate 2024 retail fuel prices (INR per litre) by state.
const STATE_FUEL_PRICES: [(&str, f64); 15] = [
    ("Maharashtra", 104.65),
    ("Karnataka", 102.86),
    ("Tamil Nadu", 100.94),
    ("Andhra Pradesh", 111.01),
    ("Telangana", 109.53),
    ("Gujarat", 94.26),
    ("Rajasthan", 106.45),
    ("Madhya Pradesh", 108.65),
    ("Uttar Pradesh", 96.57),
    ("Bihar", 107.26),
    ("Punjab", 97.32),
    ("Haryana", 96.21),
    ("West Bengal", 106.88),
    ("Odisha", 103.19),
    ("Jharkhand", 99.22),
];

/// Region identifier to fuel price per litre, with a designated fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPrices {
    prices: BTreeMap<String, f64>,
}

impl RegionalPrices {
    pub fn with_defaults() -> Self {
        let mut prices = STATE_FUEL_PRICES
            .iter()
            .map(|(region, price)| (region.to_string(), *price))
            .collect::<BTreeMap<_, _>>();
        prices.insert(DEFAULT_REGION.to_string(), DEFAULT_FUEL_PRICE);
        Self { prices }
    }

    /// Adds or replaces entries. Non-finite or non-positive prices are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, f64>) -> Self {
        for (region, price) in overrides {
            if price.is_finite() && *price > 0.0 {
                self.prices.insert(region.clone(), *price);
            }
        }
        self
    }

    pub fn default_price(&self) -> f64 {
        self.prices
            .get(DEFAULT_REGION)
            .copied()
            .unwrap_or(DEFAULT_FUEL_PRICE)
    }

    /// Price for `region`, or the default entry when it is missing or unknown.
    pub fn unit_price(&self, region: Option<&str>) -> f64 {
        region
            .and_then(|name| self.prices.get(name))
            .copied()
            .unwrap_or_else(|| self.default_price())
    }

    pub fn is_known(&self, region: &str) -> bool {
        region != DEFAULT_REGION && self.prices.contains_key(region)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for RegionalPrices {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_region_resolves_to_table_price() {
        let prices = RegionalPrices::with_defaults();
        assert_eq!(prices.unit_price(Some("Maharashtra")), 104.65);
        assert_eq!(prices.unit_price(Some("Gujarat")), 94.26);
        assert!(prices.is_known("Punjab"));
    }

    #[test]
    fn unknown_or_missing_region_falls_back_to_default() {
        let prices = RegionalPrices::with_defaults();
        let fallback = prices.unit_price(Some(DEFAULT_REGION));
        assert_eq!(fallback, 100.0);
        assert_eq!(prices.unit_price(Some("Nonexistent-Region")), fallback);
        assert_eq!(prices.unit_price(Some("Delhi")), fallback);
        assert_eq!(prices.unit_price(None), fallback);
        assert!(!prices.is_known("Delhi"));
    }

    #[test]
    fn overrides_add_and_replace_entries() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Delhi".to_string(), 94.72);
        overrides.insert("Gujarat".to_string(), 95.0);
        overrides.insert("Bihar".to_string(), f64::NAN);
        let prices = RegionalPrices::with_defaults().with_overrides(&overrides);
        assert_eq!(prices.unit_price(Some("Delhi")), 94.72);
        assert_eq!(prices.unit_price(Some("Gujarat")), 95.0);
        assert_eq!(prices.unit_price(Some("Bihar")), 107.26);
    }
}
