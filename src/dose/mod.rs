pub mod converter;
pub mod integrator;
pub mod thresholds;

pub use converter::{DoseRates, SpectralDoseConverter};
pub use integrator::{DoseResult, InstantEstimate, Progress, ThresholdCrossingIntegrator};
pub use thresholds::{DoseThreshold, DoseThresholdTable, OutOfRangeError};
