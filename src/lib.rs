//! Time needed in the sun to make vitamin D, and to get sunburnt
//!
//! A UV irradiance model is queried every few minutes from the exposure start.
//! Spectra are weighted with the vitamin D and erythema action spectra and
//! accumulated until the doses for the chosen skin phototype are reached.

pub mod config;
pub mod dose;
pub mod exposure;
pub mod oracle;
pub mod sampler;
pub mod solar;
pub mod spectrum;
