use hostguest::core::thermo::conditions::{DEFAULT_TEMPERATURE_KELVIN, MOLAR_GAS_CONSTANT_KCAL};
use hostguest::core::thermo::titrant::{
    RELATIVE_TITRANT_CONCENTRATION_ERROR, UPPER_BOUND_RELATIVE_ERROR,
};
use hostguest::engine::config::DEFAULT_CORRECTED_HOST_MARKER;

pub struct DefaultsConfig {
    pub output_dir: String,
    pub temperature: f64,
    pub gas_constant: f64,
    pub titrant_error: f64,
    pub upper_bound: f64,
    pub corrected_hosts: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            temperature: DEFAULT_TEMPERATURE_KELVIN,
            gas_constant: MOLAR_GAS_CONSTANT_KCAL,
            titrant_error: RELATIVE_TITRANT_CONCENTRATION_ERROR,
            upper_bound: UPPER_BOUND_RELATIVE_ERROR,
            corrected_hosts: vec![DEFAULT_CORRECTED_HOST_MARKER.to_string()],
        }
    }
}
