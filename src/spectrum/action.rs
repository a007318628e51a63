//! Biological action spectra
//!
//! Relative effectiveness of each wavelength of the grid at producing a given
//! biological response. Both curves are normalised to 1.0 at their peak.
//!
//! - Vitamin D3: previtamin D3 synthesis in human skin (CIE 174:2006)
//! - Erythema: reference erythema action spectrum (McKinlay & Diffey 1987, CIE S 007)

use super::WavelengthGrid;

/// A named biological weighting curve sampled on [`WavelengthGrid`]
#[derive(Debug)]
pub struct ActionSpectrum {
    name: &'static str,
    values: [f64; WavelengthGrid::LEN],
}

impl ActionSpectrum {
    pub const VITAMIN_D: ActionSpectrum = ActionSpectrum {
        name: "vitamin D3",
        values: VITAMIN_D_VALUES,
    };

    pub const ERYTHEMA: ActionSpectrum = ActionSpectrum {
        name: "erythema",
        values: ERYTHEMA_VALUES,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[f64; WavelengthGrid::LEN] {
        &self.values
    }

    /// Relative weight at a grid wavelength, `None` off the grid
    pub fn value_at(&self, wavelength_nm: u32) -> Option<f64> {
        WavelengthGrid::index_of(wavelength_nm).map(|i| self.values[i])
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[rustfmt::skip]
const VITAMIN_D_VALUES: [f64; WavelengthGrid::LEN] = [
        8.780e-1, 9.030e-1, 9.280e-1, 9.520e-1, 9.760e-1, 9.830e-1, 9.900e-1, 9.960e-1,  // 290 nm
        1.000, 9.770e-1, 9.510e-1, 9.170e-1, 8.780e-1, 7.710e-1, 7.010e-1, 6.340e-1,  // 298 nm
        5.660e-1, 4.880e-1, 3.950e-1, 3.060e-1, 2.200e-1, 1.560e-1, 1.190e-1, 8.300e-2,  // 306 nm
        4.900e-2, 3.400e-2, 2.000e-2, 1.410e-2, 9.760e-3, 6.520e-3, 4.360e-3, 2.920e-3,  // 314 nm
        1.950e-3, 1.310e-3, 8.730e-4, 5.840e-4, 3.900e-4, 2.610e-4, 1.750e-4, 1.170e-4,  // 322 nm
        7.800e-5, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 330 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 338 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 346 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 354 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 362 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 370 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 378 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 386 nm
        0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000,  // 394 nm
];

#[rustfmt::skip]
const ERYTHEMA_VALUES: [f64; WavelengthGrid::LEN] = [
        1.000, 1.000, 1.000, 1.000, 1.000, 1.000, 1.000, 1.000,  // 290 nm
        1.000, 8.054e-1, 6.486e-1, 5.224e-1, 4.207e-1, 3.388e-1, 2.729e-1, 2.198e-1,  // 298 nm
        1.770e-1, 1.426e-1, 1.148e-1, 9.247e-2, 7.447e-2, 5.998e-2, 4.831e-2, 3.891e-2,  // 306 nm
        3.133e-2, 2.524e-2, 2.032e-2, 1.637e-2, 1.318e-2, 1.062e-2, 8.551e-3, 6.887e-3,  // 314 nm
        5.546e-3, 4.467e-3, 3.598e-3, 2.897e-3, 2.334e-3, 1.879e-3, 1.514e-3, 1.412e-3,  // 322 nm
        1.365e-3, 1.318e-3, 1.273e-3, 1.230e-3, 1.189e-3, 1.148e-3, 1.109e-3, 1.071e-3,  // 330 nm
        1.035e-3, 1.000e-3, 9.660e-4, 9.333e-4, 9.016e-4, 8.710e-4, 8.414e-4, 8.128e-4,  // 338 nm
        7.852e-4, 7.586e-4, 7.328e-4, 7.080e-4, 6.839e-4, 6.607e-4, 6.383e-4, 6.166e-4,  // 346 nm
        5.957e-4, 5.754e-4, 5.559e-4, 5.370e-4, 5.188e-4, 5.012e-4, 4.842e-4, 4.677e-4,  // 354 nm
        4.519e-4, 4.365e-4, 4.217e-4, 4.074e-4, 3.935e-4, 3.802e-4, 3.673e-4, 3.548e-4,  // 362 nm
        3.428e-4, 3.311e-4, 3.199e-4, 3.090e-4, 2.985e-4, 2.884e-4, 2.786e-4, 2.692e-4,  // 370 nm
        2.600e-4, 2.512e-4, 2.427e-4, 2.344e-4, 2.265e-4, 2.188e-4, 2.113e-4, 2.042e-4,  // 378 nm
        1.972e-4, 1.905e-4, 1.841e-4, 1.778e-4, 1.718e-4, 1.660e-4, 1.603e-4, 1.549e-4,  // 386 nm
        1.496e-4, 1.445e-4, 1.396e-4, 1.349e-4, 1.303e-4, 1.259e-4, 1.216e-4,  // 394 nm
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks_are_normalised() {
        assert_eq!(ActionSpectrum::VITAMIN_D.value_at(298), Some(1.0));
        assert_eq!(ActionSpectrum::ERYTHEMA.value_at(290), Some(1.0));
        assert_eq!(ActionSpectrum::ERYTHEMA.value_at(298), Some(1.0));

        let max_vitd = ActionSpectrum::VITAMIN_D
            .values()
            .iter()
            .fold(f64::MIN, |a, &b| a.max(b));
        assert_eq!(max_vitd, 1.0);
    }

    #[test]
    fn test_vitamin_d_vanishes_above_330nm() {
        for wl in 331..=400 {
            assert_eq!(ActionSpectrum::VITAMIN_D.value_at(wl), Some(0.0), "{wl}");
        }
        assert!(ActionSpectrum::VITAMIN_D.value_at(330).unwrap() > 0.0);
    }

    #[test]
    fn test_erythema_is_monotonic_after_298nm() {
        let values = ActionSpectrum::ERYTHEMA.values();
        for i in 9..values.len() {
            assert!(values[i] <= values[i - 1], "not decreasing at index {i}");
            assert!(values[i] > 0.0);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(ActionSpectrum::VITAMIN_D.name(), "vitamin D3");
        assert_eq!(ActionSpectrum::ERYTHEMA.name(), "erythema");
    }

    #[test]
    fn test_off_grid_lookup() {
        assert_eq!(ActionSpectrum::VITAMIN_D.value_at(280), None);
        assert_eq!(ActionSpectrum::ERYTHEMA.value_at(401), None);
    }

    #[test]
    fn test_sums() {
        assert!((ActionSpectrum::VITAMIN_D.sum() - 16.914398).abs() < 1e-9);
        assert!((ActionSpectrum::ERYTHEMA.sum() - 13.170018).abs() < 1e-9);
    }
}
