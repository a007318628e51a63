//! Simplified analytic UV model
//!
//! Global irradiance on a horizontal surface is approximated by attenuating the
//! extraterrestrial spectrum along the slant path:
//!
//! E(λ) = E0(λ) · ε · cos θ · exp(-m · (k_O3(λ) · O3 + ½ τ_R(λ) · p/p0 + ¼ τ_a(λ))) · CMF
//!
//! where ε is the sun-earth distance correction, m the Kasten-Young air mass,
//! τ_R the Rayleigh optical depth, τ_a the Ångström aerosol optical depth and CMF
//! a fixed cloud modification factor per sky condition. Half of the Rayleigh and
//! three quarters of the aerosol extinction are assumed to reach the surface as
//! diffuse light. Output is in mW m-2 nm-1, the scale the dose thresholds use.
//!
//! This is not a radiative transfer model. Surface albedo, cloud liquid water
//! and instrument slit functions are not modelled.

use log::debug;

use crate::config::SkyCondition;
use crate::oracle::{
    IrradianceOracle, IrradianceRequest, OracleError, SolarPositionOracle, SunAngleData,
    SunAngleRequest,
};
use crate::solar::{self, SolarPosition};
use crate::spectrum::{Spectrum, WavelengthGrid};

// Extraterrestrial spectral irradiance [mW m-2 nm-1] every 10 nm from 290 nm
const EXTRATERRESTRIAL: [f64; 12] = [
    520.0, 620.0, 690.0, 800.0, 1050.0, 1000.0, 1050.0, 1050.0, 1200.0, 1100.0, 1050.0, 1600.0,
];

const SCALE_HEIGHT_KM: f64 = 8.434;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearSkyModel {
    /// Total ozone column [Dobson units]
    pub ozone_du: f64,
    /// Ångström turbidity coefficient
    pub angstrom_beta: f64,
    pub angstrom_alpha: f64,
}

impl Default for ClearSkyModel {
    fn default() -> Self {
        Self {
            ozone_du: 350.0,
            angstrom_beta: 0.11,
            angstrom_alpha: 1.3,
        }
    }
}

impl ClearSkyModel {
    pub fn new(ozone_du: f64, angstrom_beta: f64) -> Self {
        Self {
            ozone_du,
            angstrom_beta,
            ..Default::default()
        }
    }

    /// Transmission of clouds relative to a cloudless sky
    pub fn cloud_modification_factor(sky: SkyCondition) -> f64 {
        match sky {
            SkyCondition::Cloudless => 1.0,
            SkyCondition::Scattered => 0.89,
            SkyCondition::Broken => 0.73,
            SkyCondition::Overcast => 0.31,
        }
    }

    /// Spectrum for a given solar zenith angle, independent of time and place
    pub fn spectrum_at_zenith(
        &self,
        zenith_deg: f64,
        day_of_year: u16,
        altitude_km: f64,
        sky: SkyCondition,
    ) -> Spectrum {
        let cos_zenith = zenith_deg.to_radians().cos();
        let air_mass = kasten_young_air_mass(zenith_deg);
        let pressure_ratio = (-altitude_km.max(0.0) / SCALE_HEIGHT_KM).exp();
        let ozone_atm_cm = self.ozone_du / 1000.0;
        let scale = solar::eccentricity(day_of_year)
            * cos_zenith
            * Self::cloud_modification_factor(sky);

        let values = WavelengthGrid::wavelengths()
            .map(|wl| {
                let wl = wl as f64;
                let optical_depth = ozone_absorption(wl) * ozone_atm_cm
                    + 0.5 * rayleigh_optical_depth(wl) * pressure_ratio
                    + 0.25 * self.angstrom_beta * (wl / 1000.0).powf(-self.angstrom_alpha);
                extraterrestrial(wl) * scale * (-air_mass * optical_depth).exp()
            })
            .collect();

        Spectrum::new(values).unwrap_or_else(|_| Spectrum::zeros())
    }
}

impl IrradianceOracle for ClearSkyModel {
    fn run_model(&self, request: &IrradianceRequest) -> Result<Spectrum, OracleError> {
        let position = SolarPosition::calculate(
            request.day_of_year,
            request.seconds_since_midnight_utc as f64,
            request.latitude,
            request.longitude,
        );

        if !request.silent {
            debug!(
                "clear sky model: day {}, lat {:.3}, long {:.3}, alt {:.3} km, {} s UTC, {}, zenith {:.2}",
                request.day_of_year,
                request.latitude,
                request.longitude,
                request.altitude_km,
                request.seconds_since_midnight_utc,
                request.sky_condition,
                position.zenith_deg
            );
        }

        if !(0.0..=90.0).contains(&position.zenith_deg) {
            return Err(OracleError::SunBelowHorizon {
                zenith_deg: position.zenith_deg,
            });
        }

        Ok(self.spectrum_at_zenith(
            position.zenith_deg,
            request.day_of_year,
            request.altitude_km,
            request.sky_condition,
        ))
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

impl SolarPositionOracle for ClearSkyModel {
    fn day_sun_angle_data(&self, request: &SunAngleRequest) -> Result<SunAngleData, OracleError> {
        if request.num_samples == 0 {
            return Err(OracleError::InvalidSampleCount(0));
        }

        let step = 86_400.0 / request.num_samples as f64;
        let mut data = SunAngleData {
            angles: Vec::with_capacity(request.num_samples),
            times: Vec::with_capacity(request.num_samples),
        };

        for i in 0..request.num_samples {
            let local = (i as f64 * step).floor();
            let utc = local - request.utc_offset_seconds as f64;
            let position = SolarPosition::calculate(
                request.day_of_year,
                utc,
                request.latitude,
                request.longitude,
            );
            data.angles.push(position.elevation_deg);
            data.times.push(local as u32);
        }

        Ok(data)
    }
}

fn extraterrestrial(wavelength_nm: f64) -> f64 {
    let last = (EXTRATERRESTRIAL.len() - 1) as f64;
    let position = ((wavelength_nm - 290.0) / 10.0).clamp(0.0, last);
    let i = (position.floor() as usize).min(EXTRATERRESTRIAL.len() - 2);
    let r = position - i as f64;
    (1.0 - r) * EXTRATERRESTRIAL[i] + r * EXTRATERRESTRIAL[i + 1]
}

/// Ozone absorption coefficient [(atm-cm)^-1], log-linear fit of the Huggins band
fn ozone_absorption(wavelength_nm: f64) -> f64 {
    10_f64.powf(1.6 - 0.061 * (wavelength_nm - 290.0))
}

/// Rayleigh optical depth at sea level (Fröhlich & Shaw 1980, Young 1981)
fn rayleigh_optical_depth(wavelength_nm: f64) -> f64 {
    let um = wavelength_nm / 1000.0;
    0.008569 * um.powi(-4) * (1.0 + 0.0113 * um.powi(-2) + 0.00013 * um.powi(-4))
}

/// Relative optical air mass (Kasten & Young 1989)
fn kasten_young_air_mass(zenith_deg: f64) -> f64 {
    1.0 / (zenith_deg.to_radians().cos() + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(seconds_utc: u32, sky: SkyCondition) -> IrradianceRequest {
        IrradianceRequest {
            day_of_year: 172,
            latitude: 45.0,
            longitude: 0.0,
            altitude_km: 0.0,
            seconds_since_midnight_utc: seconds_utc,
            sky_condition: sky,
            silent: true,
        }
    }

    fn total(spectrum: &Spectrum) -> f64 {
        spectrum.sanitized_values().sum()
    }

    #[test]
    fn test_night_is_a_failure() {
        let model = ClearSkyModel::default();
        let result = model.run_model(&request(0, SkyCondition::Cloudless));
        assert!(matches!(
            result,
            Err(OracleError::SunBelowHorizon { zenith_deg }) if zenith_deg > 90.0
        ));
    }

    #[test]
    fn test_noon_spectrum_has_ozone_cutoff() {
        let model = ClearSkyModel::default();
        let spectrum = model.run_model(&request(43_200, SkyCondition::Cloudless)).unwrap();
        let values = spectrum.raw();

        assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
        let at = |wl: u32| values[WavelengthGrid::index_of(wl).unwrap()];
        assert!(at(290) < at(300));
        assert!(at(300) < at(310));
        assert!(at(310) < at(320));
        // Almost nothing gets through at the short end
        assert!(at(290) < 1e-2 * at(320));
    }

    #[test]
    fn test_clouds_reduce_irradiance() {
        let model = ClearSkyModel::default();
        let mut previous = f64::MAX;
        for sky in SkyCondition::ALL {
            let spectrum = model.run_model(&request(43_200, sky)).unwrap();
            let sum = total(&spectrum);
            assert!(sum < previous, "{sky}");
            previous = sum;
        }
    }

    #[test]
    fn test_more_ozone_less_uvb() {
        let thin = ClearSkyModel::new(250.0, 0.11);
        let thick = ClearSkyModel::new(450.0, 0.11);
        let thin = thin.spectrum_at_zenith(30.0, 172, 0.0, SkyCondition::Cloudless);
        let thick = thick.spectrum_at_zenith(30.0, 172, 0.0, SkyCondition::Cloudless);
        let i = WavelengthGrid::index_of(305).unwrap();
        assert!(thin.raw()[i] > 2.0 * thick.raw()[i]);
    }

    #[test]
    fn test_altitude_increases_irradiance() {
        let model = ClearSkyModel::default();
        let sea = model.spectrum_at_zenith(30.0, 172, 0.0, SkyCondition::Cloudless);
        let mountain = model.spectrum_at_zenith(30.0, 172, 3.0, SkyCondition::Cloudless);
        assert!(total(&mountain) > total(&sea));
    }

    #[test]
    fn test_low_sun_is_weaker() {
        let model = ClearSkyModel::default();
        let high = model.spectrum_at_zenith(20.0, 172, 0.0, SkyCondition::Cloudless);
        let low = model.spectrum_at_zenith(80.0, 172, 0.0, SkyCondition::Cloudless);
        assert!(total(&high) > 3.0 * total(&low));
    }

    #[test]
    fn test_sunrise_sunset() {
        let model = ClearSkyModel::default();
        let (rise, set) = model.sunrise_sunset(80, 0.0, 0.0, 0.0).unwrap();
        assert!(rise < 43_200 && set > 43_200);

        assert!(matches!(
            model.sunrise_sunset(355, 85.0, 0.0, 0.0),
            Err(OracleError::NoSunriseSunset)
        ));
    }

    #[test]
    fn test_day_sun_angle_data() {
        let model = ClearSkyModel::default();
        let request = SunAngleRequest {
            num_samples: 96,
            day_of_year: 172,
            utc_offset_seconds: 3600,
            latitude: 45.0,
            longitude: 15.0,
            altitude_km: 0.0,
        };

        let data = model.day_sun_angle_data(&request).unwrap();

        assert_eq!(data.angles.len(), 96);
        assert_eq!(data.times.len(), 96);
        assert_eq!(data.times[0], 0);
        assert_eq!(data.times[1], 900);
        assert!(data.times.windows(2).all(|w| w[0] < w[1]));

        // 15E with UTC+1 puts solar noon close to 12:00 local
        let (noon_index, _) = data
            .angles
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &a)| if a > best.1 { (i, a) } else { best });
        let noon = data.times[noon_index] as i64;
        assert!((noon - 43_200).abs() <= 1800, "{noon}");
    }

    #[test]
    fn test_zero_samples_is_an_error() {
        let model = ClearSkyModel::default();
        let request = SunAngleRequest {
            num_samples: 0,
            day_of_year: 1,
            utc_offset_seconds: 0,
            latitude: 0.0,
            longitude: 0.0,
            altitude_km: 0.0,
        };
        assert!(model.day_sun_angle_data(&request).is_err());
    }
}
