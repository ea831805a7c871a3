use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("quantity must be a finite positive number, got {0}")]
    InvalidQuantity(f64),
    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("coordinate is not finite: lat {lat}, lng {lng}")]
    NonFiniteCoordinate { lat: f64, lng: f64 },
    #[error("commodity must not be empty")]
    EmptyCommodity,
    #[error("amount {0} cannot be represented in whole currency units")]
    AmountOutOfRange(f64),
}
