use crate::core::models::units::JOULES_PER_CALORIE;

/// Molar gas constant in J/(mol·K).
pub const MOLAR_GAS_CONSTANT_J: f64 = 8.31446261815324;

/// Molar gas constant in kcal/(mol·K).
pub const MOLAR_GAS_CONSTANT_KCAL: f64 = MOLAR_GAS_CONSTANT_J / JOULES_PER_CALORIE / 1000.0;

/// Temperature at which all measurements in the SAMPL8 set were performed.
pub const DEFAULT_TEMPERATURE_KELVIN: f64 = 298.0;

/// Experimental conditions shared by every free-energy conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature_kelvin: f64,
    /// In kcal/(mol·K).
    pub gas_constant: f64,
}

impl Conditions {
    pub fn new(temperature_kelvin: f64) -> Self {
        Self {
            temperature_kelvin,
            gas_constant: MOLAR_GAS_CONSTANT_KCAL,
        }
    }

    /// Thermal energy R·T in kcal/mol.
    #[inline]
    pub fn rt(&self) -> f64 {
        self.gas_constant * self.temperature_kelvin
    }
}

impl Default for Conditions {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE_KELVIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rt_matches_room_temperature() {
        let rt = Conditions::default().rt();
        assert!((rt - 0.592186869).abs() < 1e-8);
    }
}
