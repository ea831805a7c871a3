//! Derived, display-oriented figures for a scored destination.

use serde::{Deserialize, Serialize};

use crate::cost::{VehicleClass, VehicleProfile};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultInsights {
    pub profit_margin_pct: f64,
    pub travel_minutes: u32,
    pub travel_time: String,
    pub risk: RiskLevel,
    pub trips_required: u32,
    pub exceeds_capacity: bool,
}

pub fn derive_insights(
    net_profit: i64,
    revenue: i64,
    distance_km: f64,
    quantity: f64,
    vehicle: &VehicleClass,
    profile: &VehicleProfile,
) -> ResultInsights {
    let travel_minutes = travel_minutes(distance_km, vehicle);
    let trips_required = trips_required(quantity, profile.capacity);
    ResultInsights {
        profit_margin_pct: profit_margin_pct(net_profit, revenue),
        travel_minutes,
        travel_time: format_travel_time(travel_minutes),
        risk: risk_level(distance_km),
        trips_required,
        exceeds_capacity: trips_required > 1,
    }
}

/// Net profit as a percentage of revenue, two decimals; zero for zero revenue.
pub fn profit_margin_pct(net_profit: i64, revenue: i64) -> f64 {
    if revenue == 0 {
        return 0.0;
    }
    let pct = net_profit as f64 / revenue as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Average road speed in km/h.
pub fn average_speed_kmh(vehicle: &VehicleClass) -> f64 {
    match vehicle {
        VehicleClass::Bike => 40.0,
        VehicleClass::Auto => 35.0,
        VehicleClass::MiniTruck => 45.0,
        VehicleClass::LargeTruck => 50.0,
        VehicleClass::Tractor => 25.0,
        VehicleClass::Other(_) => 40.0,
    }
}

pub fn travel_minutes(distance_km: f64, vehicle: &VehicleClass) -> u32 {
    let minutes = distance_km.max(0.0) / average_speed_kmh(vehicle) * 60.0;
    minutes.round() as u32
}

pub fn format_travel_time(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    }
}

pub fn risk_level(distance_km: f64) -> RiskLevel {
    if distance_km < 40.0 {
        RiskLevel::Low
    } else if distance_km < 70.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn trips_required(quantity: f64, capacity: f64) -> u32 {
    if capacity <= 0.0 || !quantity.is_finite() {
        return 1;
    }
    ((quantity / capacity).ceil() as u32).max(1)
}
