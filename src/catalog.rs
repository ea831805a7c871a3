//! Candidate destination lists supplied to the optimizer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::optimizer::filter::positive_price;
use crate::optimizer::Destination;

const BUILTIN_CATALOG: &str = include_str!("../demos/mandis.json");

/// The bundled sample of major Indian mandis.
pub fn builtin() -> Result<Vec<Destination>> {
    parse_destinations(BUILTIN_CATALOG).context("failed parsing built-in mandi catalog")
}

pub fn load(path: &Path) -> Result<Vec<Destination>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading destinations: {}", path.display()))?;
    parse_destinations(&data)
        .with_context(|| format!("failed parsing destinations: {}", path.display()))
}

/// Loads `path` when given, otherwise the built-in catalog.
pub fn load_or_builtin(path: Option<&Path>) -> Result<Vec<Destination>> {
    match path {
        Some(path) => load(path),
        None => builtin(),
    }
}

/// Open destinations, narrowed to those buying `crop` at a positive price
/// when a non-blank crop is given.
pub fn open_destinations<'a>(
    destinations: &'a [Destination],
    crop: Option<&str>,
) -> Vec<&'a Destination> {
    let crop = crop.map(str::trim).filter(|c| !c.is_empty());
    destinations
        .iter()
        .filter(|d| d.is_open)
        .filter(|d| crop.map_or(true, |c| positive_price(d, c).is_some()))
        .collect()
}

/// Accepts either a bare JSON array or an object with a `destinations` array.
pub fn parse_destinations(data: &str) -> Result<Vec<Destination>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Shape {
        List(Vec<Destination>),
        Wrapped { destinations: Vec<Destination> },
    }

    let shape: Shape = serde_json::from_str(data)?;
    Ok(match shape {
        Shape::List(items) => items,
        Shape::Wrapped { destinations } => destinations,
    })
}
