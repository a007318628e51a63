//! Solar elevation over a local day
//!
//! Sampling and alignment to the exposure window are two separate passes. The
//! sampler only talks to the position model, [`align_to_exposure`] only needs
//! the samples and a finished [`DoseResult`].

use std::vec;

use log::{debug, warn};

use crate::dose::DoseResult;
use crate::exposure::{ExposureParameters, SECONDS_PER_DAY};
use crate::oracle::{SolarPositionOracle, SunAngleRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunSample {
    /// Seconds since local midnight
    pub time_of_day_seconds: u32,
    pub elevation_deg: f64,
    pub in_exposure: bool,
    /// Inserted at the exposure start rather than returned by the model
    pub synthetic: bool,
}

impl SunSample {
    fn new(time_of_day_seconds: u32, elevation_deg: f64) -> Self {
        Self {
            time_of_day_seconds,
            elevation_deg,
            in_exposure: false,
            synthetic: false,
        }
    }
}

pub struct SolarGeometrySampler<'a, P: SolarPositionOracle + ?Sized> {
    oracle: &'a P,
}

impl<'a, P: SolarPositionOracle + ?Sized> SolarGeometrySampler<'a, P> {
    pub fn new(oracle: &'a P) -> Self {
        Self { oracle }
    }

    /// Evenly spaced elevation samples over the local day of `params`.
    ///
    /// Any model failure gives an empty sequence.
    pub fn sample_day(&self, params: &ExposureParameters, num_samples: usize) -> DaySamples {
        if num_samples == 0 {
            return DaySamples::empty();
        }

        let request = SunAngleRequest {
            num_samples,
            day_of_year: params.day_of_year,
            utc_offset_seconds: params.utc_offset_seconds,
            latitude: params.latitude,
            longitude: params.longitude,
            altitude_km: params.altitude_km,
        };

        let data = match self.oracle.day_sun_angle_data(&request) {
            Ok(data) => data,
            Err(e) => {
                debug!("Sun angle model failed: {e}");
                return DaySamples::empty();
            }
        };

        if data.angles.len() != data.times.len() {
            warn!(
                "Sun angle model returned {} angles for {} times, ignoring",
                data.angles.len(),
                data.times.len()
            );
            return DaySamples::empty();
        }

        DaySamples {
            times: data.times.into_iter(),
            angles: data.angles.into_iter(),
        }
    }
}

/// Samples produced by [`SolarGeometrySampler::sample_day`], in time order
#[derive(Debug)]
pub struct DaySamples {
    times: vec::IntoIter<u32>,
    angles: vec::IntoIter<f64>,
}

impl DaySamples {
    fn empty() -> Self {
        Self {
            times: Vec::new().into_iter(),
            angles: Vec::new().into_iter(),
        }
    }
}

impl Iterator for DaySamples {
    type Item = SunSample;

    fn next(&mut self) -> Option<SunSample> {
        let time = self.times.next()?;
        let angle = self.angles.next()?;
        Some(SunSample::new(time, angle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.times.size_hint()
    }
}

/// Local time interval during which the skin is exposed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureWindow {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl ExposureWindow {
    /// Runs from the exposure start until the last target is reached, or until
    /// the end of the day when none is.
    pub fn new(params: &ExposureParameters, result: &DoseResult) -> Self {
        let start_seconds = params.local_start_seconds() as f64;
        let end_of_day = SECONDS_PER_DAY as f64;
        let end_seconds = match result.longest_crossing_seconds() {
            Some(crossing) => (start_seconds + crossing).min(end_of_day),
            None => end_of_day,
        };

        Self {
            start_seconds,
            end_seconds,
        }
    }

    pub fn contains(&self, time_of_day_seconds: u32) -> bool {
        let t = time_of_day_seconds as f64;
        t >= self.start_seconds && t <= self.end_seconds
    }
}

/// Flags the samples falling inside the exposure window and inserts one
/// synthetic sample at the exposure start.
pub fn align_to_exposure<I>(
    samples: I,
    params: &ExposureParameters,
    result: &DoseResult,
) -> ExposureAligned<I::IntoIter>
where
    I: IntoIterator<Item = SunSample>,
{
    ExposureAligned {
        inner: samples.into_iter(),
        window: ExposureWindow::new(params, result),
        start: params.local_start_seconds(),
        previous: None,
        pending: None,
        start_marked: false,
    }
}

#[derive(Debug)]
pub struct ExposureAligned<I> {
    inner: I,
    window: ExposureWindow,
    start: u32,
    previous: Option<SunSample>,
    pending: Option<SunSample>,
    start_marked: bool,
}

impl<I> ExposureAligned<I> {
    fn flag(&self, mut sample: SunSample) -> SunSample {
        sample.in_exposure = self.window.contains(sample.time_of_day_seconds);
        sample
    }

    fn start_sample(&self, next: &SunSample) -> SunSample {
        let elevation_deg = match self.previous {
            Some(prev) if prev.time_of_day_seconds < self.start => {
                let span = (next.time_of_day_seconds - prev.time_of_day_seconds) as f64;
                let r = (self.start - prev.time_of_day_seconds) as f64 / span;
                (1.0 - r) * prev.elevation_deg + r * next.elevation_deg
            }
            _ => next.elevation_deg,
        };

        SunSample {
            time_of_day_seconds: self.start,
            elevation_deg,
            in_exposure: false,
            synthetic: true,
        }
    }
}

impl<I: Iterator<Item = SunSample>> Iterator for ExposureAligned<I> {
    type Item = SunSample;

    fn next(&mut self) -> Option<SunSample> {
        if let Some(sample) = self.pending.take() {
            self.previous = Some(sample);
            return Some(self.flag(sample));
        }

        let sample = self.inner.next()?;

        if !self.start_marked {
            if sample.time_of_day_seconds == self.start {
                self.start_marked = true;
            } else if sample.time_of_day_seconds > self.start {
                self.start_marked = true;
                let synthetic = self.start_sample(&sample);
                self.pending = Some(sample);
                return Some(self.flag(synthetic));
            }
        }

        self.previous = Some(sample);
        Some(self.flag(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, SunAngleData};
    use std::cell::Cell;

    /// Elevation rising by one degree per sample
    struct RampOracle {
        calls: Cell<u32>,
    }

    impl RampOracle {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl SolarPositionOracle for RampOracle {
        fn day_sun_angle_data(
            &self,
            request: &SunAngleRequest,
        ) -> Result<SunAngleData, OracleError> {
            self.calls.set(self.calls.get() + 1);
            let n = request.num_samples;
            Ok(SunAngleData {
                angles: (0..n).map(|i| i as f64).collect(),
                times: (0..n).map(|i| (i * 86_400 / n) as u32).collect(),
            })
        }
    }

    struct FailingOracle;

    impl SolarPositionOracle for FailingOracle {
        fn day_sun_angle_data(&self, _: &SunAngleRequest) -> Result<SunAngleData, OracleError> {
            Err(OracleError::ModelFailure(-1))
        }
    }

    struct MismatchedOracle;

    impl SolarPositionOracle for MismatchedOracle {
        fn day_sun_angle_data(&self, _: &SunAngleRequest) -> Result<SunAngleData, OracleError> {
            Ok(SunAngleData {
                angles: vec![1.0, 2.0],
                times: vec![0],
            })
        }
    }

    fn params_at_local(seconds: u32) -> ExposureParameters {
        ExposureParameters {
            seconds_since_midnight_utc: seconds,
            ..Default::default()
        }
    }

    fn result_with_times(vitamin_d: f64, erythema: f64) -> DoseResult {
        DoseResult {
            vitamin_d_time_seconds: vitamin_d,
            erythema_time_seconds: erythema,
            vitamin_d_percent_of_target: if vitamin_d > 0.0 { 1.0 } else { 0.5 },
            erythema_percent_of_target: if erythema > 0.0 { 1.0 } else { 0.5 },
            accumulated_spectrum: Vec::new(),
            slices_evaluated: 1,
        }
    }

    #[test]
    fn test_failing_oracle_gives_empty_sequence() {
        let sampler = SolarGeometrySampler::new(&FailingOracle);
        let samples = sampler.sample_day(&ExposureParameters::default(), 500);
        assert_eq!(samples.count(), 0);
    }

    #[test]
    fn test_mismatched_lengths_give_empty_sequence() {
        let sampler = SolarGeometrySampler::new(&MismatchedOracle);
        assert_eq!(sampler.sample_day(&ExposureParameters::default(), 2).count(), 0);
    }

    #[test]
    fn test_zero_samples_skips_the_model() {
        let oracle = RampOracle::new();
        let sampler = SolarGeometrySampler::new(&oracle);
        assert_eq!(sampler.sample_day(&ExposureParameters::default(), 0).count(), 0);
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_sample_day() {
        let oracle = RampOracle::new();
        let sampler = SolarGeometrySampler::new(&oracle);
        let samples: Vec<SunSample> = sampler
            .sample_day(&ExposureParameters::default(), 48)
            .collect();

        assert_eq!(oracle.calls.get(), 1);
        assert_eq!(samples.len(), 48);
        assert_eq!(samples[1].time_of_day_seconds, 1800);
        assert!(samples.iter().all(|s| !s.in_exposure && !s.synthetic));
    }

    #[test]
    fn test_synthetic_start_is_interpolated_and_inserted_once() {
        let oracle = RampOracle::new();
        let sampler = SolarGeometrySampler::new(&oracle);
        // 10:15 local, between the 10:00 and 10:30 samples
        let params = params_at_local(36_900);
        let result = result_with_times(1200.0, 0.0);

        let aligned: Vec<SunSample> =
            align_to_exposure(sampler.sample_day(&params, 48), &params, &result).collect();

        assert_eq!(aligned.len(), 49);
        let synthetic: Vec<&SunSample> = aligned.iter().filter(|s| s.synthetic).collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].time_of_day_seconds, 36_900);
        // Samples 20 and 21 have elevations 20 and 21
        assert!((synthetic[0].elevation_deg - 20.5).abs() < 1e-9);

        assert!(
            aligned
                .windows(2)
                .all(|w| w[0].time_of_day_seconds < w[1].time_of_day_seconds)
        );
    }

    #[test]
    fn test_no_insertion_on_exact_sample() {
        let params = params_at_local(36_000);
        let result = result_with_times(600.0, 0.0);
        let samples = (0..48).map(|i| SunSample::new(i * 1800, i as f64));

        let aligned: Vec<SunSample> = align_to_exposure(samples, &params, &result).collect();

        assert_eq!(aligned.len(), 48);
        assert!(aligned.iter().all(|s| !s.synthetic));
        assert!(aligned[20].in_exposure);
    }

    #[test]
    fn test_start_before_first_sample_uses_its_elevation() {
        let params = params_at_local(100);
        let result = result_with_times(0.0, 0.0);
        let samples = vec![SunSample::new(900, -40.0), SunSample::new(1800, -39.0)];

        let aligned: Vec<SunSample> = align_to_exposure(samples, &params, &result).collect();

        assert_eq!(aligned.len(), 3);
        assert!(aligned[0].synthetic);
        assert_eq!(aligned[0].elevation_deg, -40.0);
    }

    #[test]
    fn test_exposure_window_flags() {
        let params = params_at_local(36_000);
        // Erythema takes longest, window ends at 11:00
        let result = result_with_times(600.0, 3600.0);
        let samples = (0..48).map(|i| SunSample::new(i * 1800, 0.0));

        let flagged: Vec<u32> = align_to_exposure(samples, &params, &result)
            .filter(|s| s.in_exposure)
            .map(|s| s.time_of_day_seconds)
            .collect();

        assert_eq!(flagged, vec![36_000, 37_800, 39_600]);
    }

    #[test]
    fn test_unreached_window_runs_to_end_of_day() {
        let params = params_at_local(75_600);
        let result = result_with_times(0.0, 0.0);
        let window = ExposureWindow::new(&params, &result);
        assert_eq!(window.end_seconds, 86_400.0);

        let long = result_with_times(30_000.0, 0.0);
        let window = ExposureWindow::new(&params, &long);
        assert_eq!(window.end_seconds, 86_400.0);
        assert!(window.contains(86_000));
        assert!(!window.contains(1_000));
    }

    #[test]
    fn test_window_uses_local_time() {
        let params = ExposureParameters {
            seconds_since_midnight_utc: 3600,
            utc_offset_seconds: -4 * 3600,
            ..Default::default()
        };
        let window = ExposureWindow::new(&params, &result_with_times(600.0, 0.0));
        assert_eq!(window.start_seconds, 75_600.0);
        assert_eq!(window.end_seconds, 76_200.0);
    }
}
