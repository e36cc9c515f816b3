use super::units::{Dimension, Unit, UnitError};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text used for [`Value::Unavailable`] in every input and output format.
pub const UNAVAILABLE_TEXT: &str = "NaN";

/// A numeric magnitude, or the marker for a measurement that could not be made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Measured(f64),
    Unavailable,
}

impl Value {
    /// Wraps a float, folding NaN into [`Value::Unavailable`].
    pub fn new(magnitude: f64) -> Self {
        if magnitude.is_nan() {
            Value::Unavailable
        } else {
            Value::Measured(magnitude)
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Value::Measured(v) => Some(v),
            Value::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Value::Measured(_))
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Value {
        match self {
            Value::Measured(v) => Value::new(f(v)),
            Value::Unavailable => Value::Unavailable,
        }
    }
}

impl From<f64> for Value {
    fn from(magnitude: f64) -> Self {
        Value::new(magnitude)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Measured(v) => write!(f, "{}", v),
            Value::Unavailable => f.write_str(UNAVAILABLE_TEXT),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Measured(v) => serializer.serialize_f64(*v),
            Value::Unavailable => serializer.serialize_str(UNAVAILABLE_TEXT),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawValue {
            Number(f64),
            Text(String),
        }

        match RawValue::deserialize(deserializer)? {
            RawValue::Number(v) => Ok(Value::new(v)),
            RawValue::Text(text) if text.trim().eq_ignore_ascii_case(UNAVAILABLE_TEXT) => {
                Ok(Value::Unavailable)
            }
            RawValue::Text(text) => Err(de::Error::custom(format!(
                "expected a number or \"{}\", found \"{}\"",
                UNAVAILABLE_TEXT, text
            ))),
        }
    }
}

/// A unit-tagged quantity with an optional uncertainty in the same unit.
///
/// An uncertainty of `None` means none was reported, which by convention in the source
/// data means the relative error was below 1%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Measurement {
    pub value: Value,
    #[serde(default)]
    pub uncertainty: Option<Value>,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, uncertainty: Option<f64>, unit: Unit) -> Self {
        Self {
            value: Value::new(value),
            uncertainty: uncertainty.map(Value::new),
            unit,
        }
    }

    pub fn unavailable(unit: Unit) -> Self {
        Self {
            value: Value::Unavailable,
            uncertainty: Some(Value::Unavailable),
            unit,
        }
    }

    pub fn expect_dimension(&self, quantity: &'static str, expected: Dimension) -> Result<(), UnitError> {
        self.unit.expect_dimension(quantity, expected)
    }

    /// Re-expresses the value and uncertainty in another unit of the same dimension.
    pub fn in_unit(&self, unit: Unit) -> Result<Measurement, UnitError> {
        let convert = |v: Value| -> Result<Value, UnitError> {
            match v {
                Value::Measured(m) => Ok(Value::new(self.unit.convert(m, unit)?)),
                Value::Unavailable => Ok(Value::Unavailable),
            }
        };
        Ok(Measurement {
            value: convert(self.value)?,
            uncertainty: self.uncertainty.map(convert).transpose()?,
            unit,
        })
    }

    /// Converts to the reporting unit of this measurement's dimension and drops the unit tag.
    pub fn strip_unit(&self) -> Result<Estimate, UnitError> {
        let reported = self.in_unit(self.unit.reporting_unit())?;
        Ok(Estimate {
            value: reported.value,
            uncertainty: reported.uncertainty,
        })
    }
}

/// A bare value/uncertainty pair expressed in a fixed reporting unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: Value,
    pub uncertainty: Option<Value>,
}

impl Estimate {
    pub fn unavailable() -> Self {
        Self {
            value: Value::Unavailable,
            uncertainty: Some(Value::Unavailable),
        }
    }
}
