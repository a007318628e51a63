//! Boundary between the dose calculation and the models providing light
//!
//! The calculation only needs three things from the outside world: a UV
//! irradiance spectrum for an instant, the sunrise and sunset times of a day,
//! and the solar elevation over a day. Any model able to answer these can be
//! plugged in, from a full radiative transfer code to a lookup table.

pub mod clear_sky;
pub mod error;
pub mod lookup_table;

pub use clear_sky::ClearSkyModel;
pub use error::OracleError;
pub use lookup_table::SpectralLut;

use crate::config::SkyCondition;
use crate::exposure::ExposureParameters;
use crate::spectrum::Spectrum;

/// One irradiance model run, on the fixed 290-400 nm grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceRequest {
    pub day_of_year: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
    pub seconds_since_midnight_utc: u32,
    pub sky_condition: SkyCondition,
    /// Suppresses per-run diagnostics
    pub silent: bool,
}

impl IrradianceRequest {
    pub fn from_parameters(params: &ExposureParameters, silent: bool) -> Self {
        Self {
            day_of_year: params.day_of_year,
            latitude: params.latitude,
            longitude: params.longitude,
            altitude_km: params.altitude_km,
            seconds_since_midnight_utc: params.seconds_since_midnight_utc,
            sky_condition: params.sky_condition,
            silent,
        }
    }
}

/// Batch request for solar elevation across one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunAngleRequest {
    pub num_samples: usize,
    pub day_of_year: u16,
    pub utc_offset_seconds: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

/// Parallel arrays returned by a [`SolarPositionOracle`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SunAngleData {
    /// Solar elevation [degrees]
    pub angles: Vec<f64>,
    /// Local time of day of each sample [seconds since local midnight]
    pub times: Vec<u32>,
}

pub trait IrradianceOracle {
    /// Spectral irradiance for one instant. An error means the spectrum must not be used.
    fn run_model(&self, request: &IrradianceRequest) -> Result<Spectrum, OracleError>;

    /// Sunrise and sunset [seconds since midnight UTC]
    fn sunrise_sunset(
        &self,
        day_of_year: u16,
        latitude: f64,
        longitude: f64,
        altitude_km: f64,
    ) -> Result<(u32, u32), OracleError>;
}

pub trait SolarPositionOracle {
    fn day_sun_angle_data(&self, request: &SunAngleRequest) -> Result<SunAngleData, OracleError>;
}
