use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::cost::{RegionalPrices, VehicleTable};
use crate::optimizer::insights::RiskLevel;
use crate::optimizer::{Destination, OptimizationResult};

pub fn render_results_table(results: &[OptimizationResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Rank",
        "Mandi",
        "Distance (km)",
        "Price/q",
        "Revenue",
        "Transport",
        "Handling",
        "Net Profit",
        "Travel",
        "Risk",
    ]);

    for r in results {
        let profit_cell = if r.net_profit >= 0 {
            Cell::new(format!("₹{}", r.net_profit)).fg(Color::Green)
        } else {
            Cell::new(format!("₹{}", r.net_profit)).fg(Color::Red)
        };
        let risk_cell = match r.insights.risk {
            RiskLevel::Low => Cell::new("LOW").fg(Color::Green),
            RiskLevel::Medium => Cell::new("MEDIUM").fg(Color::Yellow),
            RiskLevel::High => Cell::new("HIGH").fg(Color::Red),
        };
        table.add_row(Row::from(vec![
            Cell::new(r.rank.to_string()),
            Cell::new(&r.destination_name),
            Cell::new(format!("{:.1}", r.distance_km)),
            Cell::new(format!("{:.0}", r.unit_price)),
            Cell::new(r.revenue.to_string()),
            Cell::new(r.transport_cost.to_string()),
            Cell::new(r.handling_cost.to_string()),
            profit_cell,
            Cell::new(&r.insights.travel_time),
            risk_cell,
        ]));
    }
    table.to_string()
}

pub fn render_vehicles_table(vehicles: &VehicleTable) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vehicle", "km/litre", "Base ₹/km", "Capacity (q)"]);
    for (class, profile) in vehicles.entries() {
        table.add_row(vec![
            class.to_string(),
            format!("{}", profile.efficiency),
            format!("{}", profile.base_rate),
            format!("{}", profile.capacity),
        ]);
    }
    let fallback = vehicles.fallback();
    table.add_row(vec![
        "(other)".to_string(),
        format!("{}", fallback.efficiency),
        format!("{}", fallback.base_rate),
        format!("{}", fallback.capacity),
    ]);
    table.to_string()
}

/// Lists destinations; with `crop` the price column shows that crop's rate.
pub fn render_destinations_table(destinations: &[&Destination], crop: Option<&str>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let price_header = crop.map_or_else(|| "Crops".to_string(), |c| format!("{c} ₹/q"));
    table.set_header(vec![
        "ID".to_string(),
        "Mandi".to_string(),
        "State".to_string(),
        price_header,
        "Handling ₹/q".to_string(),
    ]);
    for d in destinations {
        let prices = match crop {
            Some(c) => d.price_for(c).map_or_else(|| "-".to_string(), |p| format!("{p:.0}")),
            None => d.crop_prices.keys().cloned().collect::<Vec<_>>().join(", "),
        };
        table.add_row(vec![
            d.id.clone(),
            d.name.clone(),
            d.state.clone().unwrap_or_default(),
            prices,
            d.handling_rate.map(|r| format!("{r:.0}")).unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_fuel_table(prices: &RegionalPrices) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Region", "Fuel ₹/litre"]);
    for (region, price) in prices.entries() {
        table.add_row(vec![region.to_string(), format!("{price:.2}")]);
    }
    table.to_string()
}
