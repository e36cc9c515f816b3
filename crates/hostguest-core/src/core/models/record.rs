use super::measurement::{Estimate, Value};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Column names of a [`SystemRecord`], in the order every renderer emits them.
pub const FIELD_NAMES: [&str; 11] = [
    "name", "SMILES", "Ka", "dKa", "DH", "dDH", "TDS", "dTDS", "n", "DG", "dDG",
];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Invalid system identifier '{0}'. Expected 'HOST-GUEST' (e.g., 'CB8-G1').")]
pub struct SystemIdError(pub String);

/// Identifies one host-guest complex, written as `HOST-GUEST`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId {
    pub host: String,
    pub guest: String,
}

impl SystemId {
    pub fn new(host: impl Into<String>, guest: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            guest: guest.into(),
        }
    }
}

impl FromStr for SystemId {
    type Err = SystemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('-') {
            Some((host, guest)) if !host.is_empty() && !guest.is_empty() => {
                Ok(SystemId::new(host, guest))
            }
            _ => Err(SystemIdError(s.to_string())),
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.host, self.guest)
    }
}

impl<'de> Deserialize<'de> for SystemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One cell of a flattened record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(Value),
    Missing,
}

impl Serialize for Cell<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Number(value) => value.serialize(serializer),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// The finalized, unit-stripped entry for one host-guest system.
///
/// Energies are in kcal/mol and the association constant in M^-1.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRecord {
    pub id: SystemId,
    pub name: String,
    pub smiles: String,
    pub ka: Estimate,
    pub dh: Estimate,
    pub tds: Estimate,
    pub dg: Estimate,
    pub n: Value,
}

impl SystemRecord {
    /// Cells aligned with [`FIELD_NAMES`].
    pub fn cells(&self) -> [Cell<'_>; 11] {
        let uncertainty = |e: &Estimate| match e.uncertainty {
            Some(v) => Cell::Number(v),
            None => Cell::Missing,
        };
        [
            Cell::Text(&self.name),
            Cell::Text(&self.smiles),
            Cell::Number(self.ka.value),
            uncertainty(&self.ka),
            Cell::Number(self.dh.value),
            uncertainty(&self.dh),
            Cell::Number(self.tds.value),
            uncertainty(&self.tds),
            Cell::Number(self.n),
            Cell::Number(self.dg.value),
            uncertainty(&self.dg),
        ]
    }
}

impl Serialize for SystemRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_NAMES.len()))?;
        for (name, cell) in FIELD_NAMES.iter().zip(self.cells()) {
            map.serialize_entry(name, &cell)?;
        }
        map.end()
    }
}

/// Ordered collection of finalized records, keyed by system id when serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    records: Vec<SystemRecord>,
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SystemRecord) {
        self.records.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&SystemRecord> {
        self.records.iter().find(|r| r.id.to_string() == id)
    }

    pub fn records(&self) -> &[SystemRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SystemRecord> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = SystemRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Serialize for MeasurementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.id.to_string(), record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SystemRecord {
        SystemRecord {
            id: SystemId::new("CB8", "G1"),
            name: "benzene".to_string(),
            smiles: "c1ccccc1".to_string(),
            ka: Estimate {
                value: Value::Measured(150000.0),
                uncertainty: Some(Value::Measured(10000.0)),
            },
            dh: Estimate {
                value: Value::Measured(-7.8),
                uncertainty: Some(Value::Measured(0.3)),
            },
            tds: Estimate {
                value: Value::Measured(-0.8),
                uncertainty: None,
            },
            dg: Estimate::unavailable(),
            n: Value::Measured(1.0),
        }
    }

    #[test]
    fn system_id_parses_host_and_guest() {
        let id: SystemId = "TEETOA-G3".parse().unwrap();
        assert_eq!(id.host, "TEETOA");
        assert_eq!(id.guest, "G3");
        assert_eq!(id.to_string(), "TEETOA-G3");
    }

    #[test]
    fn system_id_rejects_missing_separator() {
        assert!("CB8G1".parse::<SystemId>().is_err());
        assert!("-G1".parse::<SystemId>().is_err());
        assert!("CB8-".parse::<SystemId>().is_err());
    }

    #[test]
    fn cells_follow_field_order() {
        let record = sample_record();
        let cells = record.cells();
        assert_eq!(cells[0], Cell::Text("benzene"));
        assert_eq!(cells[1], Cell::Text("c1ccccc1"));
        assert_eq!(cells[2], Cell::Number(Value::Measured(150000.0)));
        assert_eq!(cells[7], Cell::Missing);
        assert_eq!(cells[8], Cell::Number(Value::Measured(1.0)));
        assert_eq!(cells[10], Cell::Number(Value::Unavailable));
    }

    #[test]
    fn table_serializes_as_ordered_object() {
        let mut second = sample_record();
        second.id = SystemId::new("CB8", "G0");
        let table: MeasurementTable = vec![sample_record(), second].into_iter().collect();

        let json = serde_json::to_string(&table).unwrap();
        let first = json.find("\"CB8-G1\"").unwrap();
        let second = json.find("\"CB8-G0\"").unwrap();
        assert!(first < second);
        assert!(json.contains("\"dTDS\":null"));
        assert!(json.contains("\"DG\":\"NaN\""));
        assert!(json.starts_with("{\"CB8-G1\":{\"name\":\"benzene\",\"SMILES\":\"c1ccccc1\",\"Ka\":150000.0"));
    }

    #[test]
    fn table_lookup_by_id() {
        let table: MeasurementTable = vec![sample_record()].into_iter().collect();
        assert!(table.get("CB8-G1").is_some());
        assert!(table.get("CB8-G2").is_none());
        assert_eq!(table.len(), 1);
    }
}
