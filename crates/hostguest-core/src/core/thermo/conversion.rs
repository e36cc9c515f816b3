use super::DerivationError;
use super::conditions::Conditions;
use crate::core::models::measurement::{Measurement, Value};
use crate::core::models::units::{Dimension, Unit};

/// Binding free energy from an association constant.
///
/// `DG = -RT ln(Ka * 1 M)` with the uncertainty propagated to first order,
/// `dDG = RT / Ka * dKa`. The result is in kcal/mol.
///
/// # Errors
///
/// Returns an error if `ka` is not an inverse concentration or is not positive.
pub fn free_energy_from_association_constant(
    ka: &Measurement,
    conditions: &Conditions,
) -> Result<Measurement, DerivationError> {
    ka.expect_dimension("Ka", Dimension::InverseConcentration)?;
    let ka = ka.in_unit(Unit::PerMolar)?;
    let Value::Measured(ka_value) = ka.value else {
        return Ok(Measurement::unavailable(Unit::KilocaloriesPerMole));
    };
    if ka_value <= 0.0 {
        return Err(DerivationError::NonPositive {
            quantity: "Ka",
            value: ka_value,
        });
    }

    let rt = conditions.rt();
    let dg = -rt * ka_value.ln();
    let ddg_dka = -rt / ka_value;
    let uncertainty = ka
        .uncertainty
        .map(|dka| dka.map(|d| (ddg_dka * ddg_dka * d * d).sqrt()));

    Ok(Measurement {
        value: Value::new(dg),
        uncertainty,
        unit: Unit::KilocaloriesPerMole,
    })
}

/// Association constant from a binding free energy, the inverse of
/// [`free_energy_from_association_constant`]. The result is in M^-1.
///
/// An unavailable free energy yields an unavailable constant and uncertainty.
pub fn association_constant_from_free_energy(
    dg: &Measurement,
    conditions: &Conditions,
) -> Result<Measurement, DerivationError> {
    dg.expect_dimension("DG", Dimension::MolarEnergy)?;
    let dg = dg.in_unit(Unit::KilocaloriesPerMole)?;
    let Value::Measured(dg_value) = dg.value else {
        return Ok(Measurement::unavailable(Unit::PerMolar));
    };

    let rt = conditions.rt();
    let ka = (-dg_value / rt).exp();
    let dka_ddg = -ka / rt;
    let uncertainty = dg
        .uncertainty
        .map(|ddg| ddg.map(|d| (dka_ddg * dka_ddg * d * d).sqrt()));

    Ok(Measurement {
        value: Value::new(ka),
        uncertainty,
        unit: Unit::PerMolar,
    })
}

/// Entropic term `TDS = DH - DG`, with `dTDS = sqrt(dDH^2 + dDG^2)`.
///
/// If either uncertainty is unreported the result has none either.
pub fn entropy_from_free_energy_and_enthalpy(
    dg: &Measurement,
    dh: &Measurement,
) -> Result<Measurement, DerivationError> {
    dg.expect_dimension("DG", Dimension::MolarEnergy)?;
    dh.expect_dimension("DH", Dimension::MolarEnergy)?;
    let dg = dg.in_unit(Unit::KilocaloriesPerMole)?;
    let dh = dh.in_unit(Unit::KilocaloriesPerMole)?;

    let (Value::Measured(g), Value::Measured(h)) = (dg.value, dh.value) else {
        return Ok(Measurement::unavailable(Unit::KilocaloriesPerMole));
    };

    let uncertainty = match (dg.uncertainty, dh.uncertainty) {
        (Some(Value::Measured(ddg)), Some(Value::Measured(ddh))) => {
            Some(Value::new((ddh * ddh + ddg * ddg).sqrt()))
        }
        (Some(_), Some(_)) => Some(Value::Unavailable),
        _ => None,
    };

    Ok(Measurement {
        value: Value::new(h - g),
        uncertainty,
        unit: Unit::KilocaloriesPerMole,
    })
}

/// Association constant from a dissociation constant: `Ka = 1/Kd`, `dKa = dKd/Kd^2`.
pub fn association_from_dissociation(kd: &Measurement) -> Result<Measurement, DerivationError> {
    kd.expect_dimension("Kd", Dimension::Concentration)?;
    let kd = kd.in_unit(Unit::Molar)?;
    let Value::Measured(kd_value) = kd.value else {
        return Ok(Measurement::unavailable(Unit::PerMolar));
    };
    if kd_value <= 0.0 {
        return Err(DerivationError::NonPositive {
            quantity: "Kd",
            value: kd_value,
        });
    }

    Ok(Measurement {
        value: Value::new(1.0 / kd_value),
        uncertainty: kd
            .uncertainty
            .map(|dkd| dkd.map(|d| d / (kd_value * kd_value))),
        unit: Unit::PerMolar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn value(m: &Measurement) -> f64 {
        m.value.as_f64().unwrap()
    }

    fn uncertainty(m: &Measurement) -> f64 {
        m.uncertainty.unwrap().as_f64().unwrap()
    }

    fn relative_close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < TOLERANCE
    }

    #[test]
    fn free_energy_matches_reference_value() {
        let ka = Measurement::new(1.47e5, Some(0.09e5), Unit::PerMolar);
        let dg = free_energy_from_association_constant(&ka, &Conditions::default()).unwrap();
        assert_eq!(dg.unit, Unit::KilocaloriesPerMole);
        assert!((value(&dg) + 7.0459).abs() < 1e-3);
        let expected_ddg = Conditions::default().rt() * 0.09 / 1.47;
        assert!(relative_close(uncertainty(&dg), expected_ddg));
    }

    #[test]
    fn round_trip_recovers_association_constant() {
        let conditions = Conditions::default();
        for (ka_value, dka_value) in [(1.47e5, 0.09e5), (2.1e10, 0.2e10), (3.5, 0.4), (0.02, 0.001)] {
            let ka = Measurement::new(ka_value, Some(dka_value), Unit::PerMolar);
            let dg = free_energy_from_association_constant(&ka, &conditions).unwrap();
            let back = association_constant_from_free_energy(&dg, &conditions).unwrap();
            assert!(relative_close(value(&back), ka_value));
            assert!(relative_close(uncertainty(&back), dka_value));
        }
    }

    #[test]
    fn missing_uncertainty_stays_missing() {
        let ka = Measurement::new(1.0e4, None, Unit::PerMolar);
        let dg = free_energy_from_association_constant(&ka, &Conditions::default()).unwrap();
        assert_eq!(dg.uncertainty, None);
        let back = association_constant_from_free_energy(&dg, &Conditions::default()).unwrap();
        assert_eq!(back.uncertainty, None);
    }

    #[test]
    fn unavailable_free_energy_yields_unavailable_constant() {
        let dg = Measurement::unavailable(Unit::KilojoulesPerMole);
        let ka = association_constant_from_free_energy(&dg, &Conditions::default()).unwrap();
        assert_eq!(ka.value, Value::Unavailable);
        assert_eq!(ka.uncertainty, Some(Value::Unavailable));
        assert_eq!(ka.unit, Unit::PerMolar);
    }

    #[test]
    fn free_energy_in_kilojoules_is_converted_first() {
        let conditions = Conditions::default();
        let dg_kj = Measurement::new(-29.1, Some(0.2), Unit::KilojoulesPerMole);
        let dg_kcal = dg_kj.in_unit(Unit::KilocaloriesPerMole).unwrap();
        let from_kj = association_constant_from_free_energy(&dg_kj, &conditions).unwrap();
        let from_kcal = association_constant_from_free_energy(&dg_kcal, &conditions).unwrap();
        assert!(relative_close(value(&from_kj), value(&from_kcal)));
        assert!((value(&from_kj) - 126_087.0).abs() < 100.0);
    }

    #[test]
    fn non_positive_association_constant_is_rejected() {
        let ka = Measurement::new(0.0, None, Unit::PerMolar);
        let result = free_energy_from_association_constant(&ka, &Conditions::default());
        assert!(matches!(result, Err(DerivationError::NonPositive { quantity: "Ka", .. })));
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let not_ka = Measurement::new(-7.0, None, Unit::KilocaloriesPerMole);
        let result = free_energy_from_association_constant(&not_ka, &Conditions::default());
        assert!(matches!(result, Err(DerivationError::Unit(_))));
    }

    #[test]
    fn entropy_is_enthalpy_minus_free_energy() {
        let dg = Measurement::new(-7.05, Some(0.04), Unit::KilocaloriesPerMole);
        let dh = Measurement::new(-7.84, Some(0.3), Unit::KilocaloriesPerMole);
        let tds = entropy_from_free_energy_and_enthalpy(&dg, &dh).unwrap();
        assert_eq!(value(&tds), -7.84 - -7.05);
        assert!((uncertainty(&tds) - (0.3f64.powi(2) + 0.04f64.powi(2)).sqrt()).abs() < TOLERANCE);
    }

    #[test]
    fn entropy_with_unavailable_enthalpy_is_unavailable() {
        let dg = Measurement::new(-13.9, Some(0.1), Unit::KilojoulesPerMole);
        let dh = Measurement::unavailable(Unit::KilojoulesPerMole);
        let tds = entropy_from_free_energy_and_enthalpy(&dg, &dh).unwrap();
        assert_eq!(tds.value, Value::Unavailable);
    }

    #[test]
    fn entropy_without_uncertainty_has_none() {
        let dg = Measurement::new(-7.0, None, Unit::KilocaloriesPerMole);
        let dh = Measurement::new(-8.0, Some(0.1), Unit::KilocaloriesPerMole);
        let tds = entropy_from_free_energy_and_enthalpy(&dg, &dh).unwrap();
        assert_eq!(tds.uncertainty, None);
    }

    #[test]
    fn dissociation_constant_is_inverted() {
        let kd = Measurement::new(2.0e-6, Some(1.0e-7), Unit::Molar);
        let ka = association_from_dissociation(&kd).unwrap();
        assert!(relative_close(value(&ka), 5.0e5));
        assert!(relative_close(uncertainty(&ka), 1.0e-7 / 4.0e-12));
        assert_eq!(ka.unit, Unit::PerMolar);
    }
}
