use crate::core::models::record::SystemId;
use crate::core::thermo::conditions::{Conditions, DEFAULT_TEMPERATURE_KELVIN, MOLAR_GAS_CONSTANT_KCAL};
use crate::core::thermo::titrant::{RELATIVE_TITRANT_CONCENTRATION_ERROR, UPPER_BOUND_RELATIVE_ERROR};
use std::path::PathBuf;
use thiserror::Error;

/// Host name fragment marking systems whose concentrations were already corrected.
pub const DEFAULT_CORRECTED_HOST_MARKER: &str = "OA";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Settings of the derivation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationConfig {
    pub conditions: Conditions,
    pub relative_titrant_error: f64,
    pub upper_bound_relative_error: f64,
    /// Hosts whose name contains any of these fragments skip the titrant error correction.
    pub corrected_host_markers: Vec<String>,
}

impl DerivationConfig {
    pub fn applies_titrant_correction(&self, id: &SystemId) -> bool {
        !self
            .corrected_host_markers
            .iter()
            .any(|marker| id.host.contains(marker.as_str()))
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            conditions: Conditions::default(),
            relative_titrant_error: RELATIVE_TITRANT_CONCENTRATION_ERROR,
            upper_bound_relative_error: UPPER_BOUND_RELATIVE_ERROR,
            corrected_host_markers: vec![DEFAULT_CORRECTED_HOST_MARKER.to_string()],
        }
    }
}

/// A pair of identifier files shared by one or more hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestSet {
    pub hosts: Vec<String>,
    pub smiles_path: PathBuf,
    pub names_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabulationConfig {
    pub measurements_path: PathBuf,
    pub guest_sets: Vec<GuestSet>,
    pub derivation: DerivationConfig,
}

#[derive(Default)]
pub struct TabulationConfigBuilder {
    measurements_path: Option<PathBuf>,
    guest_sets: Vec<GuestSet>,
    temperature_kelvin: Option<f64>,
    gas_constant: Option<f64>,
    relative_titrant_error: Option<f64>,
    upper_bound_relative_error: Option<f64>,
    corrected_host_markers: Option<Vec<String>>,
}

impl TabulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurements_path(mut self, path: PathBuf) -> Self {
        self.measurements_path = Some(path);
        self
    }
    pub fn guest_set(mut self, set: GuestSet) -> Self {
        self.guest_sets.push(set);
        self
    }
    pub fn temperature_kelvin(mut self, temperature: f64) -> Self {
        self.temperature_kelvin = Some(temperature);
        self
    }
    pub fn gas_constant(mut self, gas_constant: f64) -> Self {
        self.gas_constant = Some(gas_constant);
        self
    }
    pub fn relative_titrant_error(mut self, error: f64) -> Self {
        self.relative_titrant_error = Some(error);
        self
    }
    pub fn upper_bound_relative_error(mut self, error: f64) -> Self {
        self.upper_bound_relative_error = Some(error);
        self
    }
    pub fn corrected_host_markers(mut self, markers: Vec<String>) -> Self {
        self.corrected_host_markers = Some(markers);
        self
    }

    pub fn build(self) -> Result<TabulationConfig, ConfigError> {
        let measurements_path = self
            .measurements_path
            .ok_or(ConfigError::MissingParameter("measurements_path"))?;
        if self.guest_sets.is_empty() {
            return Err(ConfigError::MissingParameter("guest_sets"));
        }

        let temperature = self.temperature_kelvin.unwrap_or(DEFAULT_TEMPERATURE_KELVIN);
        let gas_constant = self.gas_constant.unwrap_or(MOLAR_GAS_CONSTANT_KCAL);
        let relative_titrant_error = self
            .relative_titrant_error
            .unwrap_or(RELATIVE_TITRANT_CONCENTRATION_ERROR);
        let upper_bound_relative_error = self
            .upper_bound_relative_error
            .unwrap_or(UPPER_BOUND_RELATIVE_ERROR);

        ensure_positive("temperature_kelvin", temperature)?;
        ensure_positive("gas_constant", gas_constant)?;
        ensure_non_negative("relative_titrant_error", relative_titrant_error)?;
        ensure_non_negative("upper_bound_relative_error", upper_bound_relative_error)?;

        Ok(TabulationConfig {
            measurements_path,
            guest_sets: self.guest_sets,
            derivation: DerivationConfig {
                conditions: Conditions {
                    temperature_kelvin: temperature,
                    gas_constant,
                },
                relative_titrant_error,
                upper_bound_relative_error,
                corrected_host_markers: self
                    .corrected_host_markers
                    .unwrap_or_else(|| vec![DEFAULT_CORRECTED_HOST_MARKER.to_string()]),
            },
        })
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a non-negative number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest_set() -> GuestSet {
        GuestSet {
            hosts: vec!["CB8".to_string()],
            smiles_path: PathBuf::from("CB8/guest_smiles.txt"),
            names_path: PathBuf::from("CB8/guest_names.txt"),
        }
    }

    #[test]
    fn builder_applies_defaults() {
        let config = TabulationConfigBuilder::new()
            .measurements_path(PathBuf::from("measurements.toml"))
            .guest_set(guest_set())
            .build()
            .unwrap();

        assert_eq!(config.derivation, DerivationConfig::default());
        assert_eq!(config.guest_sets.len(), 1);
        assert!((config.derivation.conditions.temperature_kelvin - 298.0).abs() < 1e-12);
        assert!((config.derivation.relative_titrant_error - 0.03).abs() < 1e-12);
    }

    #[test]
    fn builder_requires_measurements_path() {
        let result = TabulationConfigBuilder::new().guest_set(guest_set()).build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("measurements_path")
        );
    }

    #[test]
    fn builder_requires_a_guest_set() {
        let result = TabulationConfigBuilder::new()
            .measurements_path(PathBuf::from("measurements.toml"))
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingParameter("guest_sets"));
    }

    #[test]
    fn builder_rejects_non_physical_temperature() {
        let result = TabulationConfigBuilder::new()
            .measurements_path(PathBuf::from("measurements.toml"))
            .guest_set(guest_set())
            .temperature_kelvin(-5.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "temperature_kelvin",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_negative_titrant_error() {
        let result = TabulationConfigBuilder::new()
            .measurements_path(PathBuf::from("measurements.toml"))
            .guest_set(guest_set())
            .relative_titrant_error(-0.01)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn octa_acid_hosts_skip_titrant_correction() {
        let config = DerivationConfig::default();
        assert!(config.applies_titrant_correction(&"CB8-G1".parse().unwrap()));
        assert!(!config.applies_titrant_correction(&"TEMOA-G1".parse().unwrap()));
        assert!(!config.applies_titrant_correction(&"TEETOA-G3".parse().unwrap()));
    }
}
