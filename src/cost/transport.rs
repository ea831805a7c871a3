use crate::cost::round_currency;
use crate::cost::vehicle::VehicleProfile;
use crate::error::EngineError;

/// Fuel plus per-kilometre operating cost, rounded to whole currency units.
///
/// `fuel_price` is the regional price per litre.
pub fn transport_cost(
    distance_km: f64,
    profile: &VehicleProfile,
    fuel_price: f64,
) -> Result<i64, EngineError> {
    let fuel_cost = (distance_km / profile.efficiency) * fuel_price;
    let base_cost = distance_km * profile.base_rate;
    round_currency(fuel_cost + base_cost)
}
