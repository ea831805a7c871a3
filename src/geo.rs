//! Great-circle distance between two points on the Earth's surface.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.is_finite() {
            return Err(EngineError::NonFiniteCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        if !self.is_valid() {
            return Err(EngineError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Haversine distance in kilometres.
///
/// Range checks are the caller's job; only non-finite input is rejected.
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> Result<f64, EngineError> {
    for point in [from, to] {
        if !point.is_finite() {
            return Err(EngineError::NonFiniteCoordinate {
                lat: point.lat,
                lng: point.lng,
            });
        }
    }

    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    Ok(EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}
