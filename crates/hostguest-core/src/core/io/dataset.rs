use crate::core::models::measurement::{Measurement, Value};
use crate::core::models::record::SystemId;
use crate::core::models::units::Dimension;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid entry for system '{id}': {reason}")]
    InvalidSystem { id: String, reason: String },
    #[error("System '{0}' is listed more than once")]
    DuplicateSystem(String),
}

fn default_stoichiometry() -> Value {
    Value::Measured(1.0)
}

/// Sign under which a system's `TDS` was reported.
///
/// Some groups tabulate `-TΔS` in the entropy column; such rows set `TDS_convention = "-TDS"`
/// so that the relation `DG = DH - TΔS` can still be checked. The value itself is kept as
/// reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum EntropyConvention {
    #[default]
    #[serde(rename = "TDS")]
    Entropic,
    #[serde(rename = "-TDS")]
    Negated,
}

impl EntropyConvention {
    /// Converts a reported entropy column value into `TΔS`.
    pub fn entropic_term(self, reported: f64) -> f64 {
        match self {
            Self::Entropic => reported,
            Self::Negated => -reported,
        }
    }
}

/// The measurements reported for one host-guest system, exactly as curated.
///
/// Replicate fields (`Ka_1`/`Ka_2`, `Kd_1`/`Kd_2`, `DH_1`/`DH_2`) hold two independent
/// measurements of the same quantity and are combined during derivation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemEntry {
    pub id: SystemId,
    #[serde(default = "default_stoichiometry")]
    pub n: Value,
    #[serde(rename = "Ka")]
    pub ka: Option<Measurement>,
    #[serde(rename = "Kd")]
    pub kd: Option<Measurement>,
    #[serde(rename = "DG")]
    pub dg: Option<Measurement>,
    #[serde(rename = "DH")]
    pub dh: Option<Measurement>,
    #[serde(rename = "TDS")]
    pub tds: Option<Measurement>,
    #[serde(rename = "TDS_convention", default)]
    pub tds_convention: EntropyConvention,
    #[serde(rename = "Ka_1")]
    pub ka_1: Option<Measurement>,
    #[serde(rename = "Ka_2")]
    pub ka_2: Option<Measurement>,
    #[serde(rename = "Kd_1")]
    pub kd_1: Option<Measurement>,
    #[serde(rename = "Kd_2")]
    pub kd_2: Option<Measurement>,
    #[serde(rename = "DH_1")]
    pub dh_1: Option<Measurement>,
    #[serde(rename = "DH_2")]
    pub dh_2: Option<Measurement>,
}

/// Two replicate measurements of one quantity.
pub type ReplicatePair = (Measurement, Measurement);

impl SystemEntry {
    pub fn association_replicates(&self) -> Option<ReplicatePair> {
        self.ka_1.zip(self.ka_2)
    }

    pub fn dissociation_replicates(&self) -> Option<ReplicatePair> {
        self.kd_1.zip(self.kd_2)
    }

    pub fn enthalpy_replicates(&self) -> Option<ReplicatePair> {
        self.dh_1.zip(self.dh_2)
    }

    fn validate(&self) -> Result<(), String> {
        for (first, second, name) in [
            (&self.ka_1, &self.ka_2, "Ka"),
            (&self.kd_1, &self.kd_2, "Kd"),
            (&self.dh_1, &self.dh_2, "DH"),
        ] {
            if first.is_some() != second.is_some() {
                return Err(format!("replicates {name}_1 and {name}_2 must be given together"));
            }
        }

        let fields: [(&str, &Option<Measurement>, Dimension); 11] = [
            ("Ka", &self.ka, Dimension::InverseConcentration),
            ("Ka_1", &self.ka_1, Dimension::InverseConcentration),
            ("Ka_2", &self.ka_2, Dimension::InverseConcentration),
            ("Kd", &self.kd, Dimension::Concentration),
            ("Kd_1", &self.kd_1, Dimension::Concentration),
            ("Kd_2", &self.kd_2, Dimension::Concentration),
            ("DG", &self.dg, Dimension::MolarEnergy),
            ("DH", &self.dh, Dimension::MolarEnergy),
            ("DH_1", &self.dh_1, Dimension::MolarEnergy),
            ("DH_2", &self.dh_2, Dimension::MolarEnergy),
            ("TDS", &self.tds, Dimension::MolarEnergy),
        ];
        for (name, field, dimension) in fields {
            let Some(measurement) = field else { continue };
            if measurement.unit.dimension() != dimension {
                return Err(format!(
                    "{name} must be a {dimension} quantity, found unit '{}'",
                    measurement.unit
                ));
            }
            if let Some(Value::Measured(u)) = measurement.uncertainty {
                if u < 0.0 {
                    return Err(format!("uncertainty of {name} is negative ({u})"));
                }
            }
        }

        let has_binding_constant = self.ka.is_some()
            || self.kd.is_some()
            || self.ka_1.is_some()
            || self.kd_1.is_some()
            || self.dg.is_some();
        if !has_binding_constant {
            return Err("one of Ka, Kd, DG or a Ka/Kd replicate pair is required".to_string());
        }
        if self.dh.is_none() && self.dh_1.is_none() {
            return Err("DH or a DH replicate pair is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    #[serde(default)]
    systems: Vec<SystemEntry>,
}

/// The ordered set of curated measurements, loaded from a TOML resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementDataset {
    systems: Vec<SystemEntry>,
}

impl MeasurementDataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Parses and validates a dataset. `source` names the input in errors.
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, DatasetError> {
        let file: DatasetFile = toml::from_str(content).map_err(|e| DatasetError::Toml {
            path: source.to_string(),
            source: e,
        })?;

        let mut seen = HashSet::new();
        for entry in &file.systems {
            let id = entry.id.to_string();
            entry
                .validate()
                .map_err(|reason| DatasetError::InvalidSystem {
                    id: id.clone(),
                    reason,
                })?;
            if !seen.insert(id.clone()) {
                return Err(DatasetError::DuplicateSystem(id));
            }
        }
        Ok(Self {
            systems: file.systems,
        })
    }

    pub fn systems(&self) -> &[SystemEntry] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
