use crate::config::{ConfigError, SkyCondition};
use crate::dose::DoseThresholdTable;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Inputs of a single exposure calculation.
///
/// Built once per request and treated as read-only by the calculation. The
/// integrator works on its own copy when it steps through the day.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureParameters {
    /// Fraction of the body surface exposed to the sun (0-1)
    pub exposed_skin_fraction: f64,
    /// Zero-based Fitzpatrick phototype (0 = type I, 5 = type VI)
    pub skin_phototype: u8,
    pub day_of_year: u16,
    /// Decimal degrees, north positive
    pub latitude: f64,
    /// Decimal degrees, east positive
    pub longitude: f64,
    pub altitude_km: f64,
    /// Exposure start
    pub seconds_since_midnight_utc: u32,
    pub sky_condition: SkyCondition,
    /// Offset of local civil time from UTC, only used to label sampled instants
    pub utc_offset_seconds: i32,
}

impl Default for ExposureParameters {
    fn default() -> Self {
        Self {
            exposed_skin_fraction: 1.0,
            skin_phototype: 1,
            day_of_year: 104,
            latitude: 0.0,
            longitude: 0.0,
            altitude_km: 0.0,
            seconds_since_midnight_utc: 32_400,
            sky_condition: SkyCondition::Cloudless,
            utc_offset_seconds: 0,
        }
    }
}

impl ExposureParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.exposed_skin_fraction) {
            return Err(ConfigError::Range(format!(
                "exposed skin fraction must be between 0 and 1, got {}",
                self.exposed_skin_fraction
            )));
        }

        DoseThresholdTable::thresholds_for(self.skin_phototype)?;

        if !(1..=366).contains(&self.day_of_year) {
            return Err(ConfigError::Range(format!(
                "day of year must be between 1 and 366, got {}",
                self.day_of_year
            )));
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ConfigError::Range(
                "Latitude values must be between -90 and 90".to_string(),
            ));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ConfigError::Range(
                "Longitude values must be between -180 and 180".to_string(),
            ));
        }

        if !self.altitude_km.is_finite() {
            return Err(ConfigError::Range("altitude must be finite".to_string()));
        }
        if !(0.0..=6.0).contains(&self.altitude_km) {
            log::warn!(
                "surface altitude {:.3} km is outside the 0-6 km range of the model",
                self.altitude_km
            );
        }

        if self.seconds_since_midnight_utc >= SECONDS_PER_DAY {
            return Err(ConfigError::Range(format!(
                "seconds since midnight must be below {}, got {}",
                SECONDS_PER_DAY, self.seconds_since_midnight_utc
            )));
        }

        if self.utc_offset_seconds.unsigned_abs() > 14 * 3600 {
            return Err(ConfigError::Range(format!(
                "UTC offset must be within +/-14h, got {} s",
                self.utc_offset_seconds
            )));
        }

        Ok(())
    }

    /// Exposure start expressed in local time of day
    pub fn local_start_seconds(&self) -> u32 {
        to_local_seconds(self.seconds_since_midnight_utc, self.utc_offset_seconds)
    }
}

pub(crate) fn to_local_seconds(utc_seconds: u32, utc_offset_seconds: i32) -> u32 {
    (utc_seconds as i64 + utc_offset_seconds as i64).rem_euclid(SECONDS_PER_DAY as i64) as u32
}
