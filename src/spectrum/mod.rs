//! Wavelength grid and irradiance spectra
//!
//! Every spectrum handled by the crate is sampled on the same fixed UV grid,
//! 290 nm to 400 nm inclusive at 1 nm steps.

pub mod action;
pub use action::ActionSpectrum;

use std::fmt;

/// Fixed wavelength grid shared by every spectrum.
pub struct WavelengthGrid;

impl WavelengthGrid {
    pub const START_NM: u32 = 290;
    pub const END_NM: u32 = 400;
    pub const STEP_NM: u32 = 1;
    pub const LEN: usize = ((Self::END_NM - Self::START_NM) / Self::STEP_NM) as usize + 1;

    /// Wavelength in nm at grid index `i`
    pub fn wavelength(i: usize) -> Option<u32> {
        (i < Self::LEN).then(|| Self::START_NM + i as u32 * Self::STEP_NM)
    }

    /// Grid index of a wavelength, if it lies on the grid
    pub fn index_of(wavelength_nm: u32) -> Option<usize> {
        if !(Self::START_NM..=Self::END_NM).contains(&wavelength_nm) {
            return None;
        }
        let offset = wavelength_nm - Self::START_NM;
        (offset % Self::STEP_NM == 0).then_some((offset / Self::STEP_NM) as usize)
    }

    pub fn wavelengths() -> impl Iterator<Item = u32> {
        (0..Self::LEN).map(|i| Self::START_NM + i as u32 * Self::STEP_NM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    Length { expected: usize, found: usize },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumError::Length { expected, found } => write!(
                f,
                "spectrum has {} values but the wavelength grid has {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for SpectrumError {}

/// Irradiance values [mW m-2 nm-1] aligned 1:1 with [`WavelengthGrid`].
///
/// Raw values are stored untouched; oracles are allowed to emit NaN, negative or
/// infinite samples for out-of-domain wavelengths. Use [`Spectrum::sanitized`]
/// when a value feeds a computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    values: Vec<f64>,
}

impl Spectrum {
    pub fn new(values: Vec<f64>) -> Result<Self, SpectrumError> {
        if values.len() != WavelengthGrid::LEN {
            return Err(SpectrumError::Length {
                expected: WavelengthGrid::LEN,
                found: values.len(),
            });
        }
        Ok(Self { values })
    }

    pub fn zeros() -> Self {
        Self {
            values: vec![0.0; WavelengthGrid::LEN],
        }
    }

    /// Spectrum with the same value at every wavelength
    pub fn uniform(value: f64) -> Self {
        Self {
            values: vec![value; WavelengthGrid::LEN],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn raw(&self) -> &[f64] {
        &self.values
    }

    /// Value at index `i` with NaN, negative and non-finite samples mapped to 0
    pub fn sanitized(&self, i: usize) -> f64 {
        sanitize(self.values[i])
    }

    pub fn sanitized_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|&v| sanitize(v))
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
