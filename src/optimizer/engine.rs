use crate::cost::{round_currency, round_tenth, transport_cost};
use crate::error::EngineError;
use crate::geo::haversine_distance;
use crate::optimizer::filter::check_destination;
use crate::optimizer::insights::derive_insights;
use crate::optimizer::{Destination, EngineConfig, OptimizationRequest, OptimizationResult};

/// Ranks candidate destinations by net profit for a single sale.
///
/// Holds only read-only tables, so one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ProfitOptimizer {
    config: EngineConfig,
}

impl ProfitOptimizer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fuel_price(&self, region: Option<&str>) -> f64 {
        self.config.regional_prices.unit_price(region)
    }

    /// Filters, scores and ranks `destinations`.
    ///
    /// Ineligible destinations are silently dropped; an empty result is not
    /// an error. Equal net profits keep their input order.
    pub fn optimize(
        &self,
        request: &OptimizationRequest,
        destinations: &[Destination],
    ) -> Result<Vec<OptimizationResult>, EngineError> {
        request.validate()?;

        let fuel_price = self.fuel_price(request.region.as_deref());
        let profile = self.config.vehicles.constants(&request.vehicle);

        let mut results = Vec::new();
        for destination in destinations {
            let Ok((location, unit_price)) = check_destination(destination, &request.commodity)
            else {
                continue;
            };

            let raw_distance = haversine_distance(&request.origin, &location)?;
            let distance_km = round_tenth(raw_distance);
            let handling_rate = self.handling_rate(destination);

            let revenue = round_currency(unit_price * request.quantity)?;
            let transport_cost = transport_cost(raw_distance, &profile, fuel_price)?;
            let handling_cost = round_currency(request.quantity * handling_rate)?;
            let net_profit = revenue
                .checked_sub(transport_cost)
                .and_then(|net| net.checked_sub(handling_cost))
                .ok_or_else(|| {
                    EngineError::AmountOutOfRange(
                        revenue as f64 - transport_cost as f64 - handling_cost as f64,
                    )
                })?;

            results.push(OptimizationResult {
                rank: 0,
                destination_id: destination.id.clone(),
                destination_name: destination.name.clone(),
                location,
                distance_km,
                unit_price,
                revenue,
                transport_cost,
                handling_cost,
                net_profit,
                handling_rate,
                fuel_price,
                is_open: destination.is_open,
                demand_score: self.demand_score(destination),
                phone: destination.phone.clone(),
                insights: derive_insights(
                    net_profit,
                    revenue,
                    distance_km,
                    request.quantity,
                    &request.vehicle,
                    &profile,
                ),
            });
        }

        // Vec::sort_by is stable.
        results.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));
        for (idx, result) in results.iter_mut().enumerate() {
            result.rank = idx + 1;
        }
        Ok(results)
    }

    fn handling_rate(&self, destination: &Destination) -> f64 {
        destination
            .handling_rate
            .filter(|rate| rate.is_finite() && *rate != 0.0)
            .unwrap_or(self.config.default_handling_rate)
    }

    fn demand_score(&self, destination: &Destination) -> f64 {
        destination
            .demand_score
            .filter(|score| score.is_finite() && *score != 0.0)
            .unwrap_or(self.config.default_demand_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{VehicleClass, VehicleProfile};
    use crate::geo::Coordinate;

    fn request() -> OptimizationRequest {
        OptimizationRequest {
            origin: Coordinate::new(28.70, 77.10),
            commodity: "wheat".to_string(),
            quantity: 10.0,
            vehicle: VehicleClass::MiniTruck,
            region: Some("Delhi".to_string()),
        }
    }

    fn mandi(id: &str, lat: f64, lng: f64, price: f64) -> Destination {
        Destination::new(id, format!("Mandi {id}"), Coordinate::new(lat, lng))
            .with_price("wheat", price)
            .with_handling_rate(100.0)
    }

    #[test]
    fn end_to_end_single_destination() {
        let optimizer = ProfitOptimizer::default();
        let azadpur = Destination::new("DL-AZP-001", "Azadpur", Coordinate::new(28.72, 77.17))
            .with_price("wheat", 2150.0)
            .with_handling_rate(120.0);

        let results = optimizer
            .optimize(&request(), &[azadpur])
            .expect("valid request");
        assert_eq!(results.len(), 1);
        let r = &results[0];

        let raw = haversine_distance(&Coordinate::new(28.70, 77.10), &Coordinate::new(28.72, 77.17))
            .expect("finite");
        assert!((7.0..=8.0).contains(&r.distance_km), "distance {}", r.distance_km);
        assert_eq!(r.fuel_price, 100.0);
        assert_eq!(r.revenue, 21_500);
        let expected_transport = round_currency(raw / 12.0 * 100.0 + raw * 15.0).expect("fits");
        assert_eq!(r.transport_cost, expected_transport);
        assert_eq!(r.handling_cost, 1_200);
        assert_eq!(r.net_profit, 21_500 - r.transport_cost - 1_200);
        assert_eq!(r.rank, 1);
        assert_eq!(r.demand_score, 50.0);
    }

    #[test]
    fn filters_closed_and_untraded_destinations() {
        let optimizer = ProfitOptimizer::default();
        let closed = mandi("closed", 28.72, 77.17, 2150.0).closed();
        let no_wheat = Destination::new("rice-only", "Rice Only", Coordinate::new(28.75, 77.2))
            .with_price("rice", 2400.0);
        let eligible = mandi("open", 28.8, 77.2, 2100.0);

        let results = optimizer
            .optimize(&request(), &[closed, no_wheat, eligible])
            .expect("valid request");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].destination_id, "open");
    }

    #[test]
    fn ranks_by_net_profit_descending() {
        // Same location, so transport and handling are identical and the
        // price alone orders the profits 100 < 300 > 200.
        let optimizer = ProfitOptimizer::default();
        let req = request();
        let base = mandi("base", 28.70, 77.10, 1.0);
        let offset = optimizer.optimize(&req, &[base]).expect("valid")[0].net_profit - 10;

        let price_for = |target: i64| (target - offset) as f64 / req.quantity;
        let dests = vec![
            mandi("a", 28.70, 77.10, price_for(100)),
            mandi("b", 28.70, 77.10, price_for(300)),
            mandi("c", 28.70, 77.10, price_for(200)),
        ];

        let results = optimizer.optimize(&req, &dests).expect("valid");
        let profits: Vec<i64> = results.iter().map(|r| r.net_profit).collect();
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        let ids: Vec<&str> = results.iter().map(|r| r.destination_id.as_str()).collect();
        assert_eq!(profits, vec![300, 200, 100]);
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_keep_input_order_and_repeat_identically() {
        let optimizer = ProfitOptimizer::default();
        let dests = vec![
            mandi("first", 28.75, 77.15, 2000.0),
            mandi("second", 28.75, 77.15, 2000.0),
            mandi("third", 28.75, 77.15, 2000.0),
        ];
        let snapshot = dests.clone();

        let once = optimizer.optimize(&request(), &dests).expect("valid");
        let twice = optimizer.optimize(&request(), &dests).expect("valid");
        assert_eq!(once, twice);
        assert_eq!(dests, snapshot);
        let ids: Vec<&str> = once.iter().map(|r| r.destination_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_candidates_yield_empty_results() {
        let optimizer = ProfitOptimizer::default();
        assert!(optimizer.optimize(&request(), &[]).expect("valid").is_empty());
    }

    #[test]
    fn invalid_quantity_fails_before_scoring() {
        let optimizer = ProfitOptimizer::default();
        let mut req = request();
        req.quantity = f64::NAN;
        let err = optimizer
            .optimize(&req, &[mandi("a", 28.72, 77.17, 2150.0)])
            .expect_err("nan quantity");
        assert!(matches!(err, EngineError::InvalidQuantity(_)));
    }

    #[test]
    fn oversized_amounts_are_rejected_not_saturated() {
        let optimizer = ProfitOptimizer::default();
        let mut req = request();
        req.quantity = 1e17;
        let dest = mandi("bulk", 28.72, 77.17, 2150.0).with_handling_rate(120.0);
        let err = optimizer.optimize(&req, &[dest]).expect_err("revenue exceeds i64");
        assert!(matches!(err, EngineError::AmountOutOfRange(_)));
    }

    #[test]
    fn net_profit_overflow_is_an_error() {
        // Revenue and the negative handling charge both fit, their difference does not.
        let optimizer = ProfitOptimizer::default();
        let mut req = request();
        req.quantity = 4e15;
        let dest = mandi("credit", 28.72, 77.17, 2150.0).with_handling_rate(-2150.0);
        let err = optimizer.optimize(&req, &[dest]).expect_err("net exceeds i64");
        assert!(matches!(err, EngineError::AmountOutOfRange(_)));
    }

    #[test]
    fn demand_score_passes_through_or_defaults() {
        let optimizer = ProfitOptimizer::default();
        let scored = mandi("scored", 28.72, 77.17, 2150.0).with_demand_score(92.0);
        let unscored = mandi("unscored", 28.72, 77.17, 2150.0);

        let results = optimizer.optimize(&request(), &[scored, unscored]).expect("valid");
        assert_eq!(results[0].demand_score, 92.0);
        assert_eq!(results[1].demand_score, 50.0);
    }

    #[test]
    fn missing_or_zero_handling_rate_uses_default() {
        let optimizer = ProfitOptimizer::default();
        let mut unset = mandi("unset", 28.72, 77.17, 2150.0);
        unset.handling_rate = None;
        let zero = mandi("zero", 28.72, 77.17, 2150.0).with_handling_rate(0.0);

        let results = optimizer.optimize(&request(), &[unset, zero]).expect("valid");
        for r in &results {
            assert_eq!(r.handling_rate, 150.0);
            assert_eq!(r.handling_cost, 1_500);
        }
    }

    #[test]
    fn net_profit_is_difference_of_rounded_components() {
        let optimizer = ProfitOptimizer::default();
        let mut req = request();
        req.quantity = 2.5;
        let dest = mandi("frac", 28.72, 77.17, 2150.3).with_handling_rate(120.3);

        let r = &optimizer.optimize(&req, &[dest]).expect("valid")[0];
        assert_eq!(r.revenue, 5_376);
        assert_eq!(r.handling_cost, 301);
        assert_eq!(r.net_profit, r.revenue - r.transport_cost - r.handling_cost);
    }

    #[test]
    fn region_and_vehicle_fall_back_gracefully() {
        let optimizer = ProfitOptimizer::default();
        let mut req = request();
        req.region = None;
        req.vehicle = VehicleClass::Other("camel".to_string());
        let dest = mandi("a", 28.72, 77.17, 2150.0);
        let fallback = optimizer.optimize(&req, &[dest.clone()]).expect("valid");

        req.region = Some("default".to_string());
        req.vehicle = VehicleClass::MiniTruck;
        let explicit = optimizer.optimize(&req, &[dest]).expect("valid");
        assert_eq!(fallback[0].transport_cost, explicit[0].transport_cost);
        assert_eq!(fallback[0].fuel_price, 100.0);
    }

    #[test]
    fn uses_configured_fallbacks() {
        let config = EngineConfig {
            default_handling_rate: 80.0,
            default_demand_score: 40.0,
            vehicles: crate::cost::VehicleTable::with_defaults().with_fallback(VehicleProfile {
                efficiency: 10.0,
                base_rate: 10.0,
                capacity: 10.0,
            }),
            ..EngineConfig::default()
        };
        let optimizer = ProfitOptimizer::new(config);
        let mut req = request();
        req.vehicle = VehicleClass::Other("camel".to_string());
        let mut dest = mandi("a", 28.72, 77.17, 2150.0);
        dest.handling_rate = None;

        let r = &optimizer.optimize(&req, &[dest]).expect("valid")[0];
        assert_eq!(r.handling_cost, 800);
        assert_eq!(r.demand_score, 40.0);
        assert!(r.insights.trips_required == 1);
    }
}
