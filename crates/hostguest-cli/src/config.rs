pub mod defaults;
pub mod models;

use crate::cli::ConfigOverrides;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use hostguest::engine::config as core_config;
use models::AppConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialConditionsConfig {
    temperature: Option<f64>,
    #[serde(rename = "gas-constant")]
    gas_constant: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialUncertaintyConfig {
    #[serde(rename = "titrant-error")]
    titrant_error: Option<f64>,
    #[serde(rename = "upper-bound")]
    upper_bound: Option<f64>,
    #[serde(rename = "corrected-hosts")]
    corrected_hosts: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialGuestSet {
    hosts: Vec<String>,
    smiles: PathBuf,
    names: PathBuf,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    measurements: Option<PathBuf>,
    #[serde(rename = "output-dir")]
    output_dir: Option<PathBuf>,
    conditions: Option<PartialConditionsConfig>,
    uncertainty: Option<PartialUncertaintyConfig>,
    #[serde(rename = "guest-sets", default)]
    guest_sets: Vec<PartialGuestSet>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Joins relative paths from the config file onto the directory holding it.
fn resolve_relative(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid numeric value for {}: {}", key, value)))
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Applies CLI overrides and defaults. Input paths from the file are relative to the
    /// file's directory; the output directory is relative to the working directory, which is
    /// also where tables are written when none is given.
    pub fn merge_with_cli(
        mut self,
        overrides: &ConfigOverrides,
        output_dir: Option<&Path>,
    ) -> Result<AppConfig> {
        self.apply_set_values(&overrides.set_values)?;
        let defaults = DefaultsConfig::default();

        let conditions = self.conditions.take().unwrap_or_default();
        let uncertainty = self.uncertainty.take().unwrap_or_default();

        let measurements_path = match (&overrides.measurements, &self.measurements) {
            (Some(cli), _) => cli.clone(),
            (None, Some(file)) => resolve_relative(&self.base_dir, file),
            (None, None) => {
                return Err(CliError::Config(
                    "A value for 'measurements' is required either in the config file or via --measurements.".to_string(),
                ));
            }
        };

        let output_dir = match (output_dir, &self.output_dir) {
            (Some(cli), _) => cli.to_path_buf(),
            (None, Some(file)) => file.clone(),
            (None, None) => PathBuf::from(&defaults.output_dir),
        };

        if self.guest_sets.is_empty() {
            return Err(CliError::Config(
                "At least one [[guest-sets]] entry is required.".to_string(),
            ));
        }

        let mut builder = core_config::TabulationConfigBuilder::new()
            .measurements_path(measurements_path)
            .temperature_kelvin(
                overrides
                    .temperature
                    .or(conditions.temperature)
                    .unwrap_or(defaults.temperature),
            )
            .gas_constant(conditions.gas_constant.unwrap_or(defaults.gas_constant))
            .relative_titrant_error(
                overrides
                    .titrant_error
                    .or(uncertainty.titrant_error)
                    .unwrap_or(defaults.titrant_error),
            )
            .upper_bound_relative_error(uncertainty.upper_bound.unwrap_or(defaults.upper_bound))
            .corrected_host_markers(
                uncertainty
                    .corrected_hosts
                    .unwrap_or(defaults.corrected_hosts),
            );

        for set in self.guest_sets {
            if set.hosts.is_empty() {
                return Err(CliError::Config(format!(
                    "Guest set {:?} does not name any host.",
                    set.smiles
                )));
            }
            builder = builder.guest_set(core_config::GuestSet {
                hosts: set.hosts,
                smiles_path: resolve_relative(&self.base_dir, &set.smiles),
                names_path: resolve_relative(&self.base_dir, &set.names),
            });
        }

        let core_config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(AppConfig {
            output_dir,
            core_config,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "conditions.temperature" => {
                    self.conditions
                        .get_or_insert_with(Default::default)
                        .temperature = Some(parse_number(key, value_str)?);
                }
                "conditions.gas-constant" => {
                    self.conditions
                        .get_or_insert_with(Default::default)
                        .gas_constant = Some(parse_number(key, value_str)?);
                }
                "uncertainty.titrant-error" => {
                    self.uncertainty
                        .get_or_insert_with(Default::default)
                        .titrant_error = Some(parse_number(key, value_str)?);
                }
                "uncertainty.upper-bound" => {
                    self.uncertainty
                        .get_or_insert_with(Default::default)
                        .upper_bound = Some(parse_number(key, value_str)?);
                }
                "uncertainty.corrected-hosts" => {
                    self.uncertainty
                        .get_or_insert_with(Default::default)
                        .corrected_hosts = Some(
                        value_str
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect(),
                    );
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
