//! Transport cost model: regional fuel prices, vehicle constants and the
//! estimator combining them.

pub mod region;
pub mod transport;
pub mod vehicle;

pub use region::{RegionalPrices, DEFAULT_REGION};
pub use transport::transport_cost;
pub use vehicle::{VehicleClass, VehicleParseError, VehicleProfile, VehicleTable};

use crate::error::EngineError;

// 2^63; `i64::MAX as f64` rounds up to this value.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Rounds to the nearest whole currency unit, halves toward positive infinity.
///
/// Fails instead of saturating when the result does not fit in an `i64`.
pub fn round_currency(value: f64) -> Result<i64, EngineError> {
    let rounded = (value + 0.5).floor();
    if !rounded.is_finite() || rounded < -I64_BOUND || rounded >= I64_BOUND {
        return Err(EngineError::AmountOutOfRange(value));
    }
    Ok(rounded as i64)
}

/// Rounds to one decimal place, halves toward positive infinity.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
