//! Time needed to reach the vitamin D and sunburn doses
//!
//! The day is cut into fixed slices during which the dose rate is assumed
//! constant. The irradiance model is run once at the start of every slice and
//! the weighted dose is accumulated until both targets are reached, light
//! disappears, or the whole day has been simulated.

use log::{debug, info};

use crate::config::CalculationSettings;
use crate::dose::converter::{DoseRates, SpectralDoseConverter};
use crate::dose::thresholds::{DoseThreshold, DoseThresholdTable, OutOfRangeError};
use crate::exposure::{ExposureParameters, SECONDS_PER_DAY};
use crate::oracle::{IrradianceOracle, IrradianceRequest};
use crate::spectrum::{Spectrum, WavelengthGrid};

/// How far one endpoint got, as presented to a user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// No dose at all could be accumulated
    InsufficientLight,
    /// Fraction of the target reached by the end of the simulation
    Partial(f64),
    /// Target reached after this many seconds of exposure
    Reached(f64),
}

impl Progress {
    fn from_dose(fraction: f64, time_seconds: f64) -> Self {
        if fraction <= 0.0 {
            Progress::InsufficientLight
        } else if fraction < 1.0 {
            Progress::Partial(fraction)
        } else {
            Progress::Reached(time_seconds)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoseResult {
    /// Seconds of exposure to reach the vitamin D target, 0 if not reached today
    pub vitamin_d_time_seconds: f64,
    /// Seconds of exposure to reach the erythema target, 0 if not reached today
    pub erythema_time_seconds: f64,
    pub vitamin_d_percent_of_target: f64,
    pub erythema_percent_of_target: f64,
    /// Unweighted irradiance accumulated per wavelength [mJ m-2 nm-1]
    pub accumulated_spectrum: Vec<f64>,
    /// Number of irradiance model runs
    pub slices_evaluated: u32,
}

impl DoseResult {
    pub fn vitamin_d_progress(&self) -> Progress {
        Progress::from_dose(self.vitamin_d_percent_of_target, self.vitamin_d_time_seconds)
    }

    pub fn erythema_progress(&self) -> Progress {
        Progress::from_dose(self.erythema_percent_of_target, self.erythema_time_seconds)
    }

    /// Longest crossing time among the endpoints that were reached
    pub fn longest_crossing_seconds(&self) -> Option<f64> {
        [self.vitamin_d_time_seconds, self.erythema_time_seconds]
            .into_iter()
            .filter(|t| *t > 0.0)
            .reduce(f64::max)
    }
}

/// Continuous-rate estimate computed from a single instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstantEstimate {
    pub vitamin_d_time_seconds: f64,
    pub erythema_time_seconds: f64,
}

#[derive(Debug)]
struct DoseAccumulator {
    target: f64,
    dose: f64,
    crossing_seconds: Option<f64>,
}

impl DoseAccumulator {
    fn new(target: f64) -> Self {
        Self {
            target,
            dose: 0.0,
            crossing_seconds: None,
        }
    }

    fn reached(&self) -> bool {
        self.crossing_seconds.is_some()
    }

    fn add(&mut self, rate: f64, slice_index: u32, slice_seconds: f64) {
        if self.reached() {
            return;
        }

        self.dose += rate * slice_seconds;
        if self.dose >= self.target {
            // Rate is constant over the slice, walk back the overshoot linearly
            let overshoot = if rate > 0.0 {
                (self.dose - self.target) / rate
            } else {
                0.0
            };
            self.crossing_seconds = Some((slice_index + 1) as f64 * slice_seconds - overshoot);
            self.dose = self.target;
        }
    }

    fn fraction(&self) -> f64 {
        if self.target > 0.0 {
            (self.dose / self.target).clamp(0.0, 1.0)
        } else if self.reached() {
            1.0
        } else {
            0.0
        }
    }

    fn time_seconds(&self) -> f64 {
        self.crossing_seconds.unwrap_or(0.0)
    }
}

pub struct ThresholdCrossingIntegrator<'a, O: IrradianceOracle + ?Sized> {
    oracle: &'a O,
    converter: SpectralDoseConverter,
    settings: CalculationSettings,
}

impl<'a, O: IrradianceOracle + ?Sized> ThresholdCrossingIntegrator<'a, O> {
    pub fn new(oracle: &'a O, settings: CalculationSettings) -> Self {
        Self {
            oracle,
            converter: SpectralDoseConverter::new(settings.correction_factor),
            settings,
        }
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Looks up the phototype thresholds, then integrates the day
    pub fn calculate(&self, params: &ExposureParameters) -> Result<DoseResult, OutOfRangeError> {
        let thresholds = DoseThresholdTable::thresholds_for(params.skin_phototype)?;
        Ok(self.integrate(params, thresholds))
    }

    /// Simulates up to one day of exposure starting at the requested instant.
    ///
    /// Stops early when both dose rates fall below the near-zero threshold or
    /// when both targets are reached. Never runs the model more than
    /// `86400 / slice_seconds` times.
    pub fn integrate(&self, params: &ExposureParameters, thresholds: DoseThreshold) -> DoseResult {
        let slice_seconds = self.settings.slice_seconds;
        let max_slices = self.settings.max_slices();

        let mut vitamin_d = DoseAccumulator::new(thresholds.vitamin_d);
        let mut erythema = DoseAccumulator::new(thresholds.erythema);
        let mut accumulated_spectrum = vec![0.0; WavelengthGrid::LEN];
        let mut slices_evaluated = 0;

        let mut slice_params = params.clone();

        for slice_index in 0..max_slices {
            slice_params.seconds_since_midnight_utc =
                (params.seconds_since_midnight_utc + slice_index * slice_seconds) % SECONDS_PER_DAY;
            slices_evaluated += 1;

            let (rates, spectrum) = self.dose_rates_at(&slice_params, true);

            if rates.both_below(self.settings.near_zero_rate) {
                debug!(
                    "slice {}: no usable light at {} s UTC, stopping",
                    slice_index, slice_params.seconds_since_midnight_utc
                );
                break;
            }

            if let Some(spectrum) = spectrum {
                for (total, irradiance) in accumulated_spectrum
                    .iter_mut()
                    .zip(spectrum.sanitized_values())
                {
                    *total += irradiance * slice_seconds as f64;
                }
            }

            vitamin_d.add(rates.vitamin_d, slice_index, slice_seconds as f64);
            erythema.add(rates.erythema, slice_index, slice_seconds as f64);

            debug!(
                "slice {}: vitamin D {:.4} mW/m2 ({:.1}%), erythema {:.4} mW/m2 ({:.1}%)",
                slice_index,
                rates.vitamin_d,
                vitamin_d.fraction() * 100.0,
                rates.erythema,
                erythema.fraction() * 100.0
            );

            if vitamin_d.reached() && erythema.reached() {
                break;
            }
        }

        let result = DoseResult {
            vitamin_d_time_seconds: vitamin_d.time_seconds(),
            erythema_time_seconds: erythema.time_seconds(),
            vitamin_d_percent_of_target: vitamin_d.fraction(),
            erythema_percent_of_target: erythema.fraction(),
            accumulated_spectrum,
            slices_evaluated,
        };

        info!(
            "integrated {} slices: vitamin D {:.0} s ({:.1}%), erythema {:.0} s ({:.1}%)",
            result.slices_evaluated,
            result.vitamin_d_time_seconds,
            result.vitamin_d_percent_of_target * 100.0,
            result.erythema_time_seconds,
            result.erythema_percent_of_target * 100.0
        );

        result
    }

    /// Time to each target if the current dose rate held indefinitely
    pub fn instantaneous_estimate(
        &self,
        params: &ExposureParameters,
        thresholds: DoseThreshold,
    ) -> InstantEstimate {
        let (rates, _) = self.dose_rates_at(params, false);

        let time_to = |target: f64, rate: f64| if rate > 0.0 { target / rate } else { 0.0 };

        InstantEstimate {
            vitamin_d_time_seconds: time_to(thresholds.vitamin_d, rates.vitamin_d),
            erythema_time_seconds: time_to(thresholds.erythema, rates.erythema),
        }
    }

    // A failed model run counts as darkness
    fn dose_rates_at(
        &self,
        params: &ExposureParameters,
        silent: bool,
    ) -> (DoseRates, Option<Spectrum>) {
        let request = IrradianceRequest::from_parameters(params, silent);
        match self.oracle.run_model(&request) {
            Ok(spectrum) => {
                let rates = self
                    .converter
                    .dose_rates(&spectrum, params.exposed_skin_fraction);
                (rates, Some(spectrum))
            }
            Err(e) => {
                debug!(
                    "irradiance model unavailable at {} s UTC: {}",
                    params.seconds_since_midnight_utc, e
                );
                (DoseRates::ZERO, None)
            }
        }
    }
}
