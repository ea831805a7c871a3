use crate::geo::Coordinate;
use crate::optimizer::Destination;

/// Why a destination is left out of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Closed,
    MissingLocation,
    NotTraded,
}

/// Usable location: present, finite, in range, and neither axis exactly zero.
pub fn usable_location(destination: &Destination) -> Option<Coordinate> {
    destination
        .location
        .filter(|loc| loc.is_valid() && loc.lat != 0.0 && loc.lng != 0.0)
}

pub fn positive_price(destination: &Destination, commodity: &str) -> Option<f64> {
    destination
        .price_for(commodity)
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// Location and unit price of an eligible destination, or the first failed predicate.
pub fn check_destination(
    destination: &Destination,
    commodity: &str,
) -> Result<(Coordinate, f64), Exclusion> {
    if !destination.is_open {
        return Err(Exclusion::Closed);
    }
    let location = usable_location(destination).ok_or(Exclusion::MissingLocation)?;
    let price = positive_price(destination, commodity).ok_or(Exclusion::NotTraded)?;
    Ok((location, price))
}
