use crate::spectrum::{ActionSpectrum, Spectrum};

/// Instantaneous biologically weighted dose rates [mW m-2]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoseRates {
    pub vitamin_d: f64,
    pub erythema: f64,
}

impl DoseRates {
    pub const ZERO: DoseRates = DoseRates {
        vitamin_d: 0.0,
        erythema: 0.0,
    };

    pub fn both_below(&self, threshold: f64) -> bool {
        self.vitamin_d < threshold && self.erythema < threshold
    }
}

/// Weights an irradiance spectrum by the action spectra
#[derive(Debug, Clone, Copy)]
pub struct SpectralDoseConverter {
    correction_factor: f64,
}

impl SpectralDoseConverter {
    pub fn new(correction_factor: f64) -> Self {
        Self { correction_factor }
    }

    /// Convolves `spectrum` with `action`.
    ///
    /// Samples that are NaN, negative or infinite count as zero. The result is
    /// always finite and non-negative.
    pub fn convert(&self, spectrum: &Spectrum, action: &ActionSpectrum) -> f64 {
        let weighted: f64 = spectrum
            .sanitized_values()
            .zip(action.values())
            .map(|(irradiance, weight)| irradiance * weight)
            .sum();

        let rate = weighted * self.correction_factor;
        if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            0.0
        }
    }

    /// Vitamin D rate scaled by the exposed skin fraction, erythema rate unscaled
    pub fn dose_rates(&self, spectrum: &Spectrum, exposed_skin_fraction: f64) -> DoseRates {
        DoseRates {
            vitamin_d: self.convert(spectrum, &ActionSpectrum::VITAMIN_D) * exposed_skin_fraction,
            erythema: self.convert(spectrum, &ActionSpectrum::ERYTHEMA),
        }
    }
}

impl Default for SpectralDoseConverter {
    fn default() -> Self {
        Self::new(0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::WavelengthGrid;

    #[test]
    fn test_unit_spectrum_pins_correction_factor() {
        let converter = SpectralDoseConverter::default();
        let ones = Spectrum::uniform(1.0);

        let vitd = converter.convert(&ones, &ActionSpectrum::VITAMIN_D);
        let ery = converter.convert(&ones, &ActionSpectrum::ERYTHEMA);

        assert!((vitd - ActionSpectrum::VITAMIN_D.sum() * 0.8).abs() < 1e-12);
        assert!((ery - ActionSpectrum::ERYTHEMA.sum() * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_anomalies_are_ignored() {
        let converter = SpectralDoseConverter::new(1.0);
        let mut values = vec![0.0; WavelengthGrid::LEN];
        values[8] = 2.0; // 298 nm, weight 1.0 in both spectra
        values[0] = f64::NAN;
        values[1] = -5.0;
        values[2] = f64::INFINITY;
        let spectrum = Spectrum::new(values).unwrap();

        assert_eq!(converter.convert(&spectrum, &ActionSpectrum::VITAMIN_D), 2.0);
        assert_eq!(converter.convert(&spectrum, &ActionSpectrum::ERYTHEMA), 2.0);
    }

    #[test]
    fn test_empty_light_is_zero() {
        let converter = SpectralDoseConverter::default();
        assert_eq!(
            converter.dose_rates(&Spectrum::zeros(), 1.0),
            DoseRates::ZERO
        );
        assert_eq!(
            converter.dose_rates(&Spectrum::uniform(-1.0), 1.0),
            DoseRates::ZERO
        );
    }

    #[test]
    fn test_overflow_is_reported_as_zero() {
        let converter = SpectralDoseConverter::default();
        let huge = Spectrum::uniform(f64::MAX);
        let rate = converter.convert(&huge, &ActionSpectrum::ERYTHEMA);
        assert!(rate.is_finite());
        assert!(rate >= 0.0);
    }

    #[test]
    fn test_exposed_fraction_only_scales_vitamin_d() {
        let converter = SpectralDoseConverter::default();
        let spectrum = Spectrum::uniform(0.5);

        let full = converter.dose_rates(&spectrum, 1.0);
        let quarter = converter.dose_rates(&spectrum, 0.25);

        assert!((quarter.vitamin_d - full.vitamin_d * 0.25).abs() < 1e-12);
        assert_eq!(quarter.erythema, full.erythema);
    }

    #[test]
    fn test_uva_only_light_does_not_make_vitamin_d() {
        let converter = SpectralDoseConverter::default();
        let mut values = vec![0.0; WavelengthGrid::LEN];
        for (i, wl) in WavelengthGrid::wavelengths().enumerate() {
            if wl > 340 {
                values[i] = 1.0;
            }
        }
        let rates = converter.dose_rates(&Spectrum::new(values).unwrap(), 1.0);
        assert_eq!(rates.vitamin_d, 0.0);
        assert!(rates.erythema > 0.0);
    }
}
