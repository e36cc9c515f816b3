use super::DerivationError;
use super::conditions::Conditions;
use super::conversion::{association_constant_from_free_energy, free_energy_from_association_constant};
use crate::core::models::measurement::{Measurement, Value};
use crate::core::models::units::{Dimension, Unit};

/// Mean of two replicates with the larger of the propagated uncertainty and the
/// standard error of the two values about their mean.
fn combine_pair(a: f64, da: f64, b: f64, db: f64) -> (f64, f64) {
    let mean = 0.5 * (a + b);
    let propagated = (da * da + db * db).sqrt();
    let std_err = (0.5 * ((a - mean).powi(2) + (b - mean).powi(2))).sqrt();
    (mean, propagated.max(std_err))
}

/// Numeric uncertainty of a replicate; an unreported one counts as zero.
fn uncertainty_or_zero(m: &Measurement) -> Option<f64> {
    match m.uncertainty {
        None => Some(0.0),
        Some(v) => v.as_f64(),
    }
}

/// Combines two independent enthalpy measurements into one point estimate.
///
/// The result is expressed in the unit of the first replicate.
pub fn combine_enthalpy_replicates(
    first: &Measurement,
    second: &Measurement,
) -> Result<Measurement, DerivationError> {
    first.expect_dimension("DH_1", Dimension::MolarEnergy)?;
    second.expect_dimension("DH_2", Dimension::MolarEnergy)?;
    let second = second.in_unit(first.unit)?;

    let (Value::Measured(a), Value::Measured(b)) = (first.value, second.value) else {
        return Ok(Measurement::unavailable(first.unit));
    };
    let (Some(da), Some(db)) = (uncertainty_or_zero(first), uncertainty_or_zero(&second)) else {
        return Ok(Measurement {
            value: Value::new(0.5 * (a + b)),
            uncertainty: Some(Value::Unavailable),
            unit: first.unit,
        });
    };

    let (mean, uncertainty) = combine_pair(a, da, b, db);
    Ok(Measurement::new(mean, Some(uncertainty), first.unit))
}

/// Combines two association constant replicates.
///
/// Free energy, not the association constant, is the normally distributed quantity, so both
/// replicates are converted to free energies, combined there, and converted back to M^-1.
pub fn combine_association_replicates(
    first: &Measurement,
    second: &Measurement,
    conditions: &Conditions,
) -> Result<Measurement, DerivationError> {
    let dg_first = free_energy_from_association_constant(first, conditions)?;
    let dg_second = free_energy_from_association_constant(second, conditions)?;

    let (Value::Measured(a), Value::Measured(b)) = (dg_first.value, dg_second.value) else {
        return Ok(Measurement::unavailable(Unit::PerMolar));
    };
    let (Some(da), Some(db)) = (uncertainty_or_zero(&dg_first), uncertainty_or_zero(&dg_second))
    else {
        let mean = Measurement {
            value: Value::new(0.5 * (a + b)),
            uncertainty: Some(Value::Unavailable),
            unit: Unit::KilocaloriesPerMole,
        };
        return association_constant_from_free_energy(&mean, conditions);
    };

    let (mean, uncertainty) = combine_pair(a, da, b, db);
    let combined = Measurement::new(mean, Some(uncertainty), Unit::KilocaloriesPerMole);
    association_constant_from_free_energy(&combined, conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enthalpy_uses_propagated_uncertainty_when_replicates_agree() {
        let a = Measurement::new(-10.0, Some(0.3), Unit::KilocaloriesPerMole);
        let b = Measurement::new(-10.2, Some(0.4), Unit::KilocaloriesPerMole);
        let combined = combine_enthalpy_replicates(&a, &b).unwrap();
        assert!((combined.value.as_f64().unwrap() + 10.1).abs() < 1e-12);
        assert!((combined.uncertainty.unwrap().as_f64().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn enthalpy_uses_standard_error_when_replicates_disagree() {
        let a = Measurement::new(-8.0, Some(0.1), Unit::KilocaloriesPerMole);
        let b = Measurement::new(-12.0, Some(0.1), Unit::KilocaloriesPerMole);
        let combined = combine_enthalpy_replicates(&a, &b).unwrap();
        assert!((combined.value.as_f64().unwrap() + 10.0).abs() < 1e-12);
        assert!((combined.uncertainty.unwrap().as_f64().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn enthalpy_replicates_in_mixed_units_are_aligned() {
        let a = Measurement::new(-10.0, Some(0.0), Unit::KilocaloriesPerMole);
        let b = Measurement::new(-41.84, Some(0.0), Unit::KilojoulesPerMole);
        let combined = combine_enthalpy_replicates(&a, &b).unwrap();
        assert_eq!(combined.unit, Unit::KilocaloriesPerMole);
        assert!((combined.value.as_f64().unwrap() + 10.0).abs() < 1e-12);
        assert!(combined.uncertainty.unwrap().as_f64().unwrap() < 1e-12);
    }

    #[test]
    fn association_replicates_are_combined_in_free_energy_space() {
        let conditions = Conditions::default();
        let a = Measurement::new(1.0e5, Some(1.0e3), Unit::PerMolar);
        let b = Measurement::new(4.0e5, Some(1.0e3), Unit::PerMolar);
        let combined = combine_association_replicates(&a, &b, &conditions).unwrap();

        // Mean of the free energies is the geometric mean of the constants.
        assert!((combined.value.as_f64().unwrap() - 2.0e5).abs() < 1e-6);

        let rt = conditions.rt();
        let std_err_dg = 0.5 * rt * 4.0f64.ln();
        let expected_dka = 2.0e5 * std_err_dg / rt;
        assert!((combined.uncertainty.unwrap().as_f64().unwrap() - expected_dka).abs() < 1e-6);
    }

    #[test]
    fn unavailable_replicate_makes_result_unavailable() {
        let a = Measurement::new(-10.0, Some(0.3), Unit::KilocaloriesPerMole);
        let b = Measurement::unavailable(Unit::KilocaloriesPerMole);
        let combined = combine_enthalpy_replicates(&a, &b).unwrap();
        assert_eq!(combined.value, Value::Unavailable);
    }
}
