use serde::Deserialize;

use crate::config::ConfigError;
use crate::exposure::SECONDS_PER_DAY;

/// Tunable constants of the dose calculation.
///
/// `correction_factor` is an empirical scaling applied to both dose rates to
/// match reference model output; it is not derived from the physics.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CalculationSettings {
    pub slice_seconds: u32,
    pub correction_factor: f64,
    pub near_zero_rate: f64,
    pub sun_samples: usize,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            slice_seconds: 600,
            correction_factor: 0.8,
            near_zero_rate: 1e-4,
            sun_samples: 500,
        }
    }
}

impl CalculationSettings {
    /// Hard bound on the number of slices simulated for one day
    pub fn max_slices(&self) -> u32 {
        SECONDS_PER_DAY / self.slice_seconds.max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slice_seconds == 0 || self.slice_seconds > SECONDS_PER_DAY {
            return Err(ConfigError::Range(format!(
                "slice_seconds must be between 1 and {}, got {}",
                SECONDS_PER_DAY, self.slice_seconds
            )));
        }
        if !self.correction_factor.is_finite() || self.correction_factor <= 0.0 {
            return Err(ConfigError::Range(format!(
                "correction_factor must be a positive number, got {}",
                self.correction_factor
            )));
        }
        if !self.near_zero_rate.is_finite() || self.near_zero_rate < 0.0 {
            return Err(ConfigError::Range(format!(
                "near_zero_rate must be a non-negative number, got {}",
                self.near_zero_rate
            )));
        }
        Ok(())
    }
}
