use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Joules in one thermochemical calorie.
pub const JOULES_PER_CALORIE: f64 = 4.184;

/// Physical dimension of a [`Unit`]. Conversions are only defined within one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    InverseConcentration,
    Concentration,
    MolarEnergy,
    Dimensionless,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::InverseConcentration => "inverse concentration",
            Dimension::Concentration => "concentration",
            Dimension::MolarEnergy => "molar energy",
            Dimension::Dimensionless => "dimensionless",
        };
        f.write_str(name)
    }
}

/// The closed set of units a measurement can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "M^-1")]
    PerMolar,
    #[serde(rename = "M")]
    Molar,
    #[serde(rename = "kcal/mol")]
    KilocaloriesPerMole,
    #[serde(rename = "kJ/mol")]
    KilojoulesPerMole,
    #[serde(rename = "1")]
    Dimensionless,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum UnitError {
    #[error("Cannot convert from {from} ({from_dimension}) to {to} ({to_dimension})")]
    IncompatibleUnits {
        from: Unit,
        from_dimension: Dimension,
        to: Unit,
        to_dimension: Dimension,
    },

    #[error("Expected a {expected} quantity for {quantity}, found unit {found}")]
    UnexpectedDimension {
        quantity: &'static str,
        expected: Dimension,
        found: Unit,
    },
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::PerMolar => Dimension::InverseConcentration,
            Unit::Molar => Dimension::Concentration,
            Unit::KilocaloriesPerMole | Unit::KilojoulesPerMole => Dimension::MolarEnergy,
            Unit::Dimensionless => Dimension::Dimensionless,
        }
    }

    /// The unit every quantity of this dimension is reported in.
    pub fn reporting_unit(self) -> Unit {
        match self.dimension() {
            Dimension::InverseConcentration => Unit::PerMolar,
            Dimension::Concentration => Unit::Molar,
            Dimension::MolarEnergy => Unit::KilocaloriesPerMole,
            Dimension::Dimensionless => Unit::Dimensionless,
        }
    }

    /// Factor that converts a magnitude in this unit to the reporting unit of its dimension.
    fn factor_to_reporting(self) -> f64 {
        match self {
            Unit::KilojoulesPerMole => 1.0 / JOULES_PER_CALORIE,
            Unit::PerMolar | Unit::Molar | Unit::KilocaloriesPerMole | Unit::Dimensionless => 1.0,
        }
    }

    pub fn convert(self, magnitude: f64, to: Unit) -> Result<f64, UnitError> {
        if self.dimension() != to.dimension() {
            return Err(UnitError::IncompatibleUnits {
                from: self,
                from_dimension: self.dimension(),
                to,
                to_dimension: to.dimension(),
            });
        }
        Ok(magnitude * self.factor_to_reporting() / to.factor_to_reporting())
    }

    pub fn expect_dimension(self, quantity: &'static str, expected: Dimension) -> Result<(), UnitError> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(UnitError::UnexpectedDimension {
                quantity,
                expected,
                found: self,
            })
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::PerMolar => "M^-1",
            Unit::Molar => "M",
            Unit::KilocaloriesPerMole => "kcal/mol",
            Unit::KilojoulesPerMole => "kJ/mol",
            Unit::Dimensionless => "1",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilojoules_convert_to_kilocalories() {
        let kcal = Unit::KilojoulesPerMole
            .convert(4.184, Unit::KilocaloriesPerMole)
            .unwrap();
        assert!((kcal - 1.0).abs() < 1e-12);
    }

    #[test]
    fn kilocalories_convert_to_kilojoules() {
        let kj = Unit::KilocaloriesPerMole
            .convert(-7.0, Unit::KilojoulesPerMole)
            .unwrap();
        assert!((kj + 29.288).abs() < 1e-12);
    }

    #[test]
    fn conversion_across_dimensions_is_rejected() {
        let result = Unit::PerMolar.convert(1.0, Unit::KilocaloriesPerMole);
        assert!(matches!(result, Err(UnitError::IncompatibleUnits { .. })));
    }

    #[test]
    fn reporting_units_are_fixed_per_dimension() {
        assert_eq!(Unit::KilojoulesPerMole.reporting_unit(), Unit::KilocaloriesPerMole);
        assert_eq!(Unit::PerMolar.reporting_unit(), Unit::PerMolar);
        assert_eq!(Unit::Molar.reporting_unit(), Unit::Molar);
    }

    #[test]
    fn expect_dimension_reports_offending_unit() {
        let err = Unit::Molar
            .expect_dimension("Ka", Dimension::InverseConcentration)
            .unwrap_err();
        assert_eq!(
            err,
            UnitError::UnexpectedDimension {
                quantity: "Ka",
                expected: Dimension::InverseConcentration,
                found: Unit::Molar,
            }
        );
    }

    #[test]
    fn units_deserialize_from_symbols() {
        #[derive(Deserialize)]
        struct Holder {
            unit: Unit,
        }
        let holder: Holder = toml::from_str(r#"unit = "kJ/mol""#).unwrap();
        assert_eq!(holder.unit, Unit::KilojoulesPerMole);
    }
}
