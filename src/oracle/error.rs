use std::fmt;

#[derive(Debug)]
pub enum OracleError {
    /// Non-zero status returned by a model run
    ModelFailure(i32),
    SunBelowHorizon { zenith_deg: f64 },
    /// Polar day or polar night
    NoSunriseSunset,
    InvalidSampleCount(usize),
    Io(std::io::Error),
    Table(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::ModelFailure(status) => {
                write!(f, "irradiance model failed with status {}", status)
            }
            OracleError::SunBelowHorizon { zenith_deg } => {
                write!(f, "sun is below the horizon (zenith {:.2} deg)", zenith_deg)
            }
            OracleError::NoSunriseSunset => {
                write!(f, "the sun neither rises nor sets on this day")
            }
            OracleError::InvalidSampleCount(n) => write!(f, "invalid sample count: {}", n),
            OracleError::Io(e) => write!(f, "I/O error: {}", e),
            OracleError::Table(msg) => write!(f, "invalid lookup table: {}", msg),
        }
    }
}

impl std::error::Error for OracleError {}

impl From<std::io::Error> for OracleError {
    fn from(err: std::io::Error) -> OracleError {
        OracleError::Io(err)
    }
}
