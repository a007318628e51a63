use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::config::SkyCondition;
use crate::oracle::{IrradianceOracle, IrradianceRequest, OracleError};
use crate::solar::{self, SolarPosition};
use crate::spectrum::{Spectrum, WavelengthGrid};

const N_THETAS: usize = 19;
const N_SKY: usize = 4;
const N_WAVELENGTHS: usize = 23;
const LUT_STEP_NM: f64 = 5.0;

// [theta][sky][wavelength]
type LutArray = Box<[[[f64; N_WAVELENGTHS]; N_SKY]; N_THETAS]>;

/// Precomputed surface irradiance spectra
///
/// Dimensions:
/// 1. ThetaS = 0 : 90 : 5
/// 2. Sky condition = cloudless, scattered, broken, overcast
/// 3. Wavelength = 290 : 400 : 5
///
/// The file is a whitespace separated list of values in that order, wavelength
/// varying fastest, in mW m-2 nm-1.
#[derive(Debug)]
pub struct SpectralLut {
    xthetas: Vec<f64>,
    ed_lut: LutArray,
}

impl SpectralLut {
    pub const VALUE_COUNT: usize = N_THETAS * N_SKY * N_WAVELENGTHS;

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OracleError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut values: Vec<f64> = Vec::with_capacity(Self::VALUE_COUNT);

        for line in reader.lines() {
            let line = line?;
            for value_str in line.split_whitespace() {
                let value = value_str
                    .parse::<f64>()
                    .map_err(|_| OracleError::Table(format!("invalid value '{value_str}'")))?;
                values.push(value);
            }
        }

        let lut = Self::from_values(&values)?;
        info!("Loaded spectral lookup table from {}", path.as_ref().display());
        Ok(lut)
    }

    pub fn from_values(values: &[f64]) -> Result<Self, OracleError> {
        if values.len() != Self::VALUE_COUNT {
            return Err(OracleError::Table(format!(
                "expected {} values, found {}",
                Self::VALUE_COUNT,
                values.len()
            )));
        }

        let mut ed_lut = Box::new([[[0.0; N_WAVELENGTHS]; N_SKY]; N_THETAS]);
        let mut chunks = values.chunks_exact(N_WAVELENGTHS);

        for theta in ed_lut.iter_mut() {
            for sky in theta.iter_mut() {
                if let Some(chunk) = chunks.next() {
                    sky.copy_from_slice(chunk);
                }
            }
        }

        Ok(SpectralLut {
            xthetas: (0..N_THETAS).map(|i| (i * 5) as f64).collect(),
            ed_lut,
        })
    }

    fn get_indice(&self, mut target: f64) -> (usize, f64) {
        if target >= 90.0 {
            target = 89.99;
        }
        if target < self.xthetas[0] {
            return (0, 0.0);
        }

        let idx = self
            .xthetas
            .windows(2)
            .position(|w| target >= w[0] && target < w[1])
            .unwrap_or(0);

        let rr = (target - self.xthetas[idx]) / (self.xthetas[idx + 1] - self.xthetas[idx]);
        (idx, rr)
    }

    /// Spectrum on the 1 nm grid for a zenith angle and sky condition
    pub fn spectrum_at_zenith(&self, zenith_deg: f64, sky: SkyCondition) -> Spectrum {
        let (ithetas, rthetas) = self.get_indice(zenith_deg);
        let low = &self.ed_lut[ithetas][sky.index()];
        let high = &self.ed_lut[(ithetas + 1).min(N_THETAS - 1)][sky.index()];

        // Remove the dimension on sunzenith angle
        let coarse: Vec<f64> = low
            .iter()
            .zip(high.iter())
            .map(|(a, b)| (1.0 - rthetas) * a + rthetas * b)
            .collect();

        // Then bring the 5 nm grid down to 1 nm
        let values = WavelengthGrid::wavelengths()
            .map(|wl| {
                let position = (wl - WavelengthGrid::START_NM) as f64 / LUT_STEP_NM;
                let i = (position.floor() as usize).min(N_WAVELENGTHS - 2);
                let r = position - i as f64;
                (1.0 - r) * coarse[i] + r * coarse[i + 1]
            })
            .collect();

        Spectrum::new(values).unwrap_or_else(|_| Spectrum::zeros())
    }
}

impl IrradianceOracle for SpectralLut {
    fn run_model(&self, request: &IrradianceRequest) -> Result<Spectrum, OracleError> {
        let position = SolarPosition::calculate(
            request.day_of_year,
            request.seconds_since_midnight_utc as f64,
            request.latitude,
            request.longitude,
        );

        if !request.silent {
            debug!(
                "lookup table: {} s UTC, zenith {:.2}, {}",
                request.seconds_since_midnight_utc, position.zenith_deg, request.sky_condition
            );
        }

        if !position.is_above_horizon() {
            return Err(OracleError::SunBelowHorizon {
                zenith_deg: position.zenith_deg,
            });
        }

        let spectrum = self.spectrum_at_zenith(position.zenith_deg, request.sky_condition);
        let eccentricity = solar::eccentricity(request.day_of_year);
        Spectrum::new(spectrum.into_values().into_iter().map(|v| v * eccentricity).collect())
            .map_err(|e| OracleError::Table(e.to_string()))
    }

    fn sunrise_sunset(
        &self,
        day_of_year: u16,
        latitude: f64,
        longitude: f64,
        _altitude_km: f64,
    ) -> Result<(u32, u32), OracleError> {
        solar::zenith_to_times(day_of_year, 90.0, latitude, longitude)
            .ok_or(OracleError::NoSunriseSunset)
    }
}
