use crate::dose::OutOfRangeError;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    MissingTime,
    Phototype(OutOfRangeError),
    Range(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::MissingTime => {
                write!(f, "time is required when time_of_day is \"custom\"")
            }
            ConfigError::Phototype(e) => write!(f, "{}", e),
            ConfigError::Range(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}

impl From<OutOfRangeError> for ConfigError {
    fn from(err: OutOfRangeError) -> ConfigError {
        ConfigError::Phototype(err)
    }
}
