use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::exposure::{ExposureParameters, to_local_seconds};

pub mod error;
pub use error::ConfigError;

pub mod settings;
pub use settings::CalculationSettings;

pub mod sky_condition;
pub use sky_condition::SkyCondition;

/// How the exposure start instant is chosen
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDayMode {
    /// 12:00 local time on the configured date
    #[default]
    AroundNoon,
    /// The current instant, date included
    Now,
    /// The configured local date and time
    Custom,
}

#[derive(Debug, Clone)]
pub struct Config {
    date: NaiveDate,
    time_of_day: TimeOfDayMode,
    time: Option<NaiveTime>,
    utc_offset_seconds: i32,
    latitude: f64,
    longitude: f64,
    altitude_km: f64,
    skin_phototype: u8,
    exposed_skin_fraction: f64,
    sky_condition: SkyCondition,
    settings: CalculationSettings,
}

// Deserializes a Config from user-facing units (Fitzpatrick type 1-6, percent of
// skin exposed, altitude in meters, UTC offset in hours) and validates it.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            date: String,
            #[serde(default)]
            time_of_day: TimeOfDayMode,
            time: Option<String>,
            #[serde(default)]
            utc_offset_hours: f64,
            latitude: f64,
            longitude: f64,
            #[serde(default)]
            altitude_m: f64,
            skin_type: u8,
            exposed_skin_percent: f64,
            #[serde(default)]
            sky_condition: SkyCondition,
            #[serde(default)]
            settings: CalculationSettings,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let date = NaiveDate::parse_from_str(&helper.date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid date format: {}", e)))?;

        let time = helper
            .time
            .as_deref()
            .map(|t| {
                NaiveTime::parse_from_str(t, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            })
            .transpose()
            .map_err(|e| D::Error::custom(format!("Invalid time format: {}", e)))?;

        if helper.time_of_day == TimeOfDayMode::Custom && time.is_none() {
            return Err(D::Error::custom(ConfigError::MissingTime));
        }

        if !(1..=6).contains(&helper.skin_type) {
            return Err(D::Error::custom(format!(
                "skin_type should be a Fitzpatrick type between 1 and 6, got {}",
                helper.skin_type
            )));
        }

        if !helper.utc_offset_hours.is_finite() {
            return Err(D::Error::custom("utc_offset_hours must be finite"));
        }

        helper.settings.validate().map_err(D::Error::custom)?;

        let config = Config {
            date,
            time_of_day: helper.time_of_day,
            time,
            utc_offset_seconds: (helper.utc_offset_hours * 3600.0).round() as i32,
            latitude: helper.latitude,
            longitude: helper.longitude,
            altitude_km: helper.altitude_m / 1000.0,
            skin_phototype: helper.skin_type - 1,
            exposed_skin_fraction: helper.exposed_skin_percent / 100.0,
            sky_condition: helper.sky_condition,
            settings: helper.settings,
        };

        // Range checks shared with parameters built in code
        config
            .exposure_parameters(Utc::now())
            .validate()
            .map_err(D::Error::custom)?;

        Ok(config)
    }
}

impl Config {
    pub fn new(date: NaiveDate, latitude: f64, longitude: f64, skin_phototype: u8) -> Self {
        Self {
            date,
            time_of_day: TimeOfDayMode::AroundNoon,
            time: None,
            utc_offset_seconds: 0,
            latitude,
            longitude,
            altitude_km: 0.0,
            skin_phototype,
            exposed_skin_fraction: 1.0,
            sky_condition: SkyCondition::Cloudless,
            settings: CalculationSettings::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    pub fn time_of_day(&self) -> TimeOfDayMode {
        self.time_of_day
    }

    pub fn with_time_of_day(mut self, mode: TimeOfDayMode, time: Option<NaiveTime>) -> Self {
        self.time_of_day = mode;
        self.time = time;
        self
    }

    pub fn with_utc_offset_seconds(mut self, offset: i32) -> Self {
        self.utc_offset_seconds = offset;
        self
    }

    /// Resolves the time-of-day mode into the parameters of one calculation.
    ///
    /// The day of year is taken from the local date while the start instant is
    /// expressed in UTC.
    pub fn exposure_parameters(&self, now: DateTime<Utc>) -> ExposureParameters {
        let (day_of_year, seconds_utc) = match self.time_of_day {
            TimeOfDayMode::AroundNoon => (
                self.date.ordinal(),
                to_local_seconds(12 * 3600, -self.utc_offset_seconds),
            ),
            TimeOfDayMode::Custom => {
                let local = self.time.unwrap_or_default();
                (
                    self.date.ordinal(),
                    to_local_seconds(local.num_seconds_from_midnight(), -self.utc_offset_seconds),
                )
            }
            TimeOfDayMode::Now => {
                let local_date = FixedOffset::east_opt(self.utc_offset_seconds)
                    .map(|tz| now.with_timezone(&tz).date_naive())
                    .unwrap_or_else(|| now.date_naive());
                (local_date.ordinal(), now.num_seconds_from_midnight())
            }
        };

        ExposureParameters {
            exposed_skin_fraction: self.exposed_skin_fraction,
            skin_phototype: self.skin_phototype,
            day_of_year: day_of_year as u16,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude_km: self.altitude_km,
            seconds_since_midnight_utc: seconds_utc,
            sky_condition: self.sky_condition,
            utc_offset_seconds: self.utc_offset_seconds,
        }
    }
}
