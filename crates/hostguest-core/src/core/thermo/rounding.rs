use crate::core::models::measurement::{Estimate, Value};

/// Decimal exponent of the leading digit of `x`, i.e. `floor(log10(|x|))`.
#[inline]
pub fn leading_digit_exponent(x: f64) -> i32 {
    x.abs().log10().floor() as i32
}

/// Rounds `x` to the decimal place `10^exponent`, ties to even.
///
/// Fractional places are rounded on the exact binary value through fixed-precision
/// formatting, so `1.115` (stored just below the tie) rounds down to `1.11`.
pub fn round_to_decimal_place(x: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        let scale = 10f64.powi(exponent);
        (x / scale).round_ties_even() * scale
    } else {
        let places = exponent.unsigned_abs() as usize;
        format!("{:.*}", places, x).parse().unwrap_or(x)
    }
}

/// Rounds a value and its uncertainty to the uncertainty's leading significant digit.
///
/// `(123456.0, 432.0)` becomes `(123500.0, 400.0)`. A zero or non-finite uncertainty
/// carries no significant digit and leaves the pair untouched.
pub fn round_to_first_significant_digit(value: f64, uncertainty: f64) -> (f64, f64) {
    if uncertainty == 0.0 || !uncertainty.is_finite() {
        return (value, uncertainty);
    }
    let exponent = leading_digit_exponent(uncertainty);
    (
        round_to_decimal_place(value, exponent),
        round_to_decimal_place(uncertainty, exponent),
    )
}

/// Applies [`round_to_first_significant_digit`] to an estimate; pairs with a sentinel or a
/// missing uncertainty pass through unchanged.
pub fn round_estimate(estimate: Estimate) -> Estimate {
    match (estimate.value, estimate.uncertainty) {
        (Value::Measured(value), Some(Value::Measured(uncertainty))) => {
            let (value, uncertainty) = round_to_first_significant_digit(value, uncertainty);
            Estimate {
                value: Value::new(value),
                uncertainty: Some(Value::new(uncertainty)),
            }
        }
        _ => estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_hundreds() {
        assert_eq!(round_to_first_significant_digit(123456.0, 432.0), (123500.0, 400.0));
    }

    #[test]
    fn aligned_pair_is_unchanged() {
        assert_eq!(round_to_first_significant_digit(147000.0, 9000.0), (147000.0, 9000.0));
    }

    #[test]
    fn rounds_to_decimal_fractions() {
        assert_eq!(round_to_first_significant_digit(-7.045950, 0.040375), (-7.05, 0.04));
        assert_eq!(round_to_first_significant_digit(-0.794, 0.2587), (-0.8, 0.3));
    }

    #[test]
    fn uncertainty_can_round_up_a_digit() {
        assert_eq!(round_to_first_significant_digit(147000.0, 10022.5), (150000.0, 10000.0));
        assert_eq!(round_to_first_significant_digit(3.21, 0.96), (3.2, 1.0));
    }

    #[test]
    fn fractional_places_round_the_stored_value() {
        assert_eq!(round_to_first_significant_digit(1.115, 0.01), (1.11, 0.01));
        assert_eq!(round_to_first_significant_digit(2.675, 0.01), (2.67, 0.01));
        assert_eq!(round_to_decimal_place(0.125, -2), 0.12);
    }

    #[test]
    fn zero_uncertainty_leaves_pair_untouched() {
        assert_eq!(round_to_first_significant_digit(1.2345, 0.0), (1.2345, 0.0));
    }

    #[test]
    fn leading_digit_exponent_handles_small_and_large_values() {
        assert_eq!(leading_digit_exponent(432.0), 2);
        assert_eq!(leading_digit_exponent(0.04), -2);
        assert_eq!(leading_digit_exponent(9000.0), 3);
        assert_eq!(leading_digit_exponent(1.0), 0);
    }

    #[test]
    fn sentinel_estimates_pass_through() {
        let unavailable = Estimate::unavailable();
        assert_eq!(round_estimate(unavailable), unavailable);

        let unreported = Estimate {
            value: Value::Measured(1.234),
            uncertainty: None,
        };
        assert_eq!(round_estimate(unreported), unreported);
    }

    #[test]
    fn estimates_are_rounded_together() {
        let estimate = Estimate {
            value: Value::Measured(-6.955067),
            uncertainty: Some(Value::Measured(0.047801)),
        };
        let rounded = round_estimate(estimate);
        assert_eq!(rounded.value, Value::Measured(-6.96));
        assert_eq!(rounded.uncertainty, Some(Value::Measured(0.05)));
    }
}
