use super::DerivationError;
use crate::core::models::measurement::{Measurement, Value};

/// Relative uncertainty in the titrant concentration of an ITC experiment.
pub const RELATIVE_TITRANT_CONCENTRATION_ERROR: f64 = 0.03;

/// Relative uncertainty assumed when a value was reported with an error below 1%.
pub const UPPER_BOUND_RELATIVE_ERROR: f64 = 0.01;

/// Outcome of [`inflate_for_titrant_error`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflation {
    pub measurement: Measurement,
    /// Whether the unreported uncertainty was replaced by the upper bound.
    pub used_upper_bound: bool,
}

/// Folds the titrant concentration error into a measurement's uncertainty.
///
/// The relative uncertainty `|dQ/Q|` (or `upper_bound` if none was reported) is combined in
/// quadrature with `relative_titrant_error` and converted back to an absolute uncertainty.
///
/// # Errors
///
/// Returns [`DerivationError::ZeroMagnitude`] if the value is exactly zero.
pub fn inflate_for_titrant_error(
    quantity: &'static str,
    measurement: &Measurement,
    relative_titrant_error: f64,
    upper_bound: f64,
) -> Result<Inflation, DerivationError> {
    let Value::Measured(value) = measurement.value else {
        return Ok(Inflation {
            measurement: *measurement,
            used_upper_bound: false,
        });
    };
    if value == 0.0 {
        return Err(DerivationError::ZeroMagnitude { quantity });
    }

    let (relative, used_upper_bound) = match measurement.uncertainty {
        None => (upper_bound, true),
        Some(Value::Measured(u)) => ((u / value).abs(), false),
        Some(Value::Unavailable) => {
            return Ok(Inflation {
                measurement: *measurement,
                used_upper_bound: false,
            });
        }
    };

    let inflated = (relative * relative + relative_titrant_error * relative_titrant_error).sqrt();
    Ok(Inflation {
        measurement: Measurement {
            uncertainty: Some(Value::new((value * inflated).abs())),
            ..*measurement
        },
        used_upper_bound,
    })
}
