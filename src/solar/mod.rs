//! Solar geometry
//!
//! Formulas from Iqbal, M. (1983) "An Introduction to Solar Radiation",
//! Academic Press. Time is given in seconds since midnight UTC, angles in
//! degrees and longitude east positive.

use std::f64::consts::PI;

use crate::exposure::SECONDS_PER_DAY;

const HALF_DAY: f64 = 43_200.0;

/// Day angle [radians]
pub fn day_angle(day_of_year: u16) -> f64 {
    2.0 * PI * (day_of_year as f64 - 1.0) / 365.0
}

/// Correction factor for the sun-earth distance
pub fn eccentricity(day_of_year: u16) -> f64 {
    let angle = day_angle(day_of_year);
    1.000110 + 0.034221 * angle.cos() + 0.001280 * angle.sin() + 0.000719 * (2.0 * angle).cos()
        + 0.000077 * (2.0 * angle).sin()
}

/// Solar declination [degrees]
pub fn declination(day_of_year: u16) -> f64 {
    let angle = day_angle(day_of_year);
    let delta = 0.006918 - 0.399912 * angle.cos() + 0.07257 * angle.sin()
        - 0.006758 * (2.0 * angle).cos()
        + 0.000907 * (2.0 * angle).sin()
        - 0.002697 * (3.0 * angle).cos()
        + 0.00148 * (3.0 * angle).sin();
    delta.to_degrees()
}

/// Equation of time [seconds]
pub fn equation_of_time(day_of_year: u16) -> f64 {
    let angle = day_angle(day_of_year);
    (0.000075 + 0.001868 * angle.cos()
        - 0.032077 * angle.sin()
        - 0.014615 * (2.0 * angle).cos()
        - 0.04089 * (2.0 * angle).sin())
        * 13750.8
}

/// Local apparent (true solar) time [seconds], not wrapped to a single day
pub fn local_apparent_time(seconds_utc: f64, day_of_year: u16, longitude: f64) -> f64 {
    seconds_utc + 240.0 * longitude + equation_of_time(day_of_year)
}

/// Inverse of [`local_apparent_time`]
fn utc_from_apparent_time(apparent: f64, day_of_year: u16, longitude: f64) -> f64 {
    apparent - 240.0 * longitude - equation_of_time(day_of_year)
}

/// Hour angle [degrees], positive in the morning
pub fn hour_angle(apparent_seconds: f64) -> f64 {
    180.0 * (1.0 - apparent_seconds / HALF_DAY)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub zenith_deg: f64,
    pub elevation_deg: f64,
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
}

impl SolarPosition {
    pub fn calculate(day_of_year: u16, seconds_utc: f64, latitude: f64, longitude: f64) -> Self {
        let apparent = local_apparent_time(seconds_utc, day_of_year, longitude);
        let declination_deg = declination(day_of_year);
        let hour_angle_deg = hour_angle(apparent);

        let delta = declination_deg.to_radians();
        let phi = latitude.to_radians();
        let omega = hour_angle_deg.to_radians();

        let cos_zenith = delta.sin() * phi.sin() + delta.cos() * phi.cos() * omega.cos();
        // Rounding can push the cosine slightly outside [-1, 1] at the poles
        let zenith_deg = cos_zenith.clamp(-1.0, 1.0).acos().to_degrees();

        SolarPosition {
            zenith_deg,
            elevation_deg: 90.0 - zenith_deg,
            declination_deg,
            hour_angle_deg,
        }
    }

    pub fn is_above_horizon(&self) -> bool {
        self.zenith_deg <= 90.0
    }
}

/// The two instants of the day at which the sun crosses `zenith_deg`.
///
/// Returns `(morning, evening)` in seconds since midnight UTC, each wrapped to
/// a single day, or `None` when the sun never reaches that zenith angle.
pub fn zenith_to_times(
    day_of_year: u16,
    zenith_deg: f64,
    latitude: f64,
    longitude: f64,
) -> Option<(u32, u32)> {
    let delta = declination(day_of_year).to_radians();
    let phi = latitude.to_radians();
    let theta = zenith_deg.to_radians();

    let cos_omega = (theta.cos() - delta.sin() * phi.sin()) / delta.cos() / phi.cos();
    if !cos_omega.is_finite() || cos_omega.abs() > 1.0 {
        return None;
    }

    let omega = cos_omega.acos();
    let morning = HALF_DAY * (1.0 - omega / PI);
    let evening = HALF_DAY * (1.0 + omega / PI);

    let wrap = |apparent: f64| {
        utc_from_apparent_time(apparent, day_of_year, longitude)
            .round()
            .rem_euclid(SECONDS_PER_DAY as f64) as u32
    };

    Some((wrap(morning), wrap(evening)))
}
