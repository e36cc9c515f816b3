//! Thermodynamic relations and first-order uncertainty propagation.
//!
//! All functions here are pure: they take unit-tagged [`Measurement`](crate::core::models::measurement::Measurement)s,
//! validate the dimensions they need and return new measurements. The sentinel
//! [`Value::Unavailable`](crate::core::models::measurement::Value::Unavailable) is threaded
//! through explicitly instead of raising.

pub mod conditions;
pub mod conversion;
pub mod replicates;
pub mod rounding;
pub mod titrant;

use crate::core::models::units::UnitError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DerivationError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("{quantity} must be positive to take its logarithm, got {value}")]
    NonPositive { quantity: &'static str, value: f64 },

    #[error("Cannot compute a relative uncertainty for {quantity} with zero magnitude")]
    ZeroMagnitude { quantity: &'static str },

    #[error("No measurement available to derive {quantity}")]
    MissingQuantity { quantity: &'static str },
}
