use anyhow::Result;

use crate::cost::VehicleTable;
use crate::optimizer::{Destination, OptimizationResult};

pub fn results_to_csv(results: &[OptimizationResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "mandi_id",
        "mandi",
        "distance_km",
        "unit_price",
        "revenue",
        "transport_cost",
        "handling_cost",
        "net_profit",
        "fuel_price",
        "demand_score",
        "travel_time",
        "risk",
    ])?;
    for r in results {
        writer.write_record([
            r.rank.to_string(),
            r.destination_id.clone(),
            r.destination_name.clone(),
            format!("{:.1}", r.distance_km),
            format!("{:.2}", r.unit_price),
            r.revenue.to_string(),
            r.transport_cost.to_string(),
            r.handling_cost.to_string(),
            r.net_profit.to_string(),
            format!("{:.2}", r.fuel_price),
            format!("{:.0}", r.demand_score),
            r.insights.travel_time.clone(),
            format!("{:?}", r.insights.risk).to_lowercase(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn destinations_to_csv(destinations: &[&Destination]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "name",
        "city",
        "state",
        "lat",
        "lng",
        "is_open",
        "handling_rate",
        "crop_prices",
    ])?;
    for d in destinations {
        let (lat, lng) = d
            .location
            .map(|loc| (loc.lat.to_string(), loc.lng.to_string()))
            .unwrap_or_default();
        let prices = d
            .crop_prices
            .iter()
            .map(|(crop, price)| format!("{crop}={price}"))
            .collect::<Vec<_>>()
            .join(";");
        writer.write_record([
            d.id.clone(),
            d.name.clone(),
            d.city.clone().unwrap_or_default(),
            d.state.clone().unwrap_or_default(),
            lat,
            lng,
            d.is_open.to_string(),
            d.handling_rate.map(|r| r.to_string()).unwrap_or_default(),
            prices,
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn vehicles_to_csv(table: &VehicleTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["vehicle", "efficiency_km_per_l", "base_rate_per_km", "capacity_quintal"])?;
    for (class, profile) in table.entries() {
        writer.write_record([
            class.to_string(),
            profile.efficiency.to_string(),
            profile.base_rate.to_string(),
            profile.capacity.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::VehicleClass;
    use crate::geo::Coordinate;
    use crate::optimizer::{Destination, OptimizationRequest, ProfitOptimizer};

    #[test]
    fn writes_header_and_one_row_per_result() {
        let request = OptimizationRequest {
            origin: Coordinate::new(28.70, 77.10),
            commodity: "wheat".to_string(),
            quantity: 10.0,
            vehicle: VehicleClass::MiniTruck,
            region: None,
        };
        let dest = Destination::new("DL-AZP-001", "Azadpur, North Delhi", Coordinate::new(28.72, 77.17))
            .with_price("wheat", 2150.0)
            .with_handling_rate(120.0);
        let results = ProfitOptimizer::default()
            .optimize(&request, &[dest])
            .expect("valid request");

        let out = results_to_csv(&results).expect("csv");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("rank,mandi_id,mandi"));
        assert!(lines[1].starts_with("1,DL-AZP-001,\"Azadpur, North Delhi\""));
    }

    #[test]
    fn lists_every_vehicle_class() {
        let out = vehicles_to_csv(&VehicleTable::with_defaults()).expect("csv");
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("miniTruck,12,15,30"));
    }

    #[test]
    fn destination_rows_join_crop_prices() {
        let dest = Destination::new("MH-NSK-001", "Lasalgaon", Coordinate::new(20.15, 74.23))
            .with_price("onion", 1800.0)
            .with_price("grapes", 4200.0);
        let out = destinations_to_csv(&[&dest]).expect("csv");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "MH-NSK-001,Lasalgaon,,,20.15,74.23,true,,grapes=4200;onion=1800");
    }
}
