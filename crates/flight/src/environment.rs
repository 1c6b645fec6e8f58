//! Launch site description shared by the engine and the stage handoff.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Atmosphere selection forwarded untouched to the flight engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AtmosphericModel {
    #[default]
    StandardAtmosphere,
    Forecast { source: String },
}

/// Launch site reference for one flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Zero for an in-air ignition.
    pub rail_length_m: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Height of the local frame origin above sea level.
    pub elevation_m: f64,
    /// Launch instant, UTC.
    pub date: NaiveDateTime,
    pub atmospheric_model: AtmosphericModel,
}

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("invalid launch date {year:04}-{month:02}-{day:02} {hour:02}:00 UTC")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },
    #[error("latitude {0} deg is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} deg is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("rail length {0} m must be finite and non-negative")]
    InvalidRailLength(f64),
    #[error("elevation {0} m must be finite")]
    InvalidElevation(f64),
}

/// Build a launch instant from `[year, month, day, hour]`.
pub fn launch_date(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
) -> Result<NaiveDateTime, EnvironmentError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or(EnvironmentError::InvalidDate {
            year,
            month,
            day,
            hour,
        })
}

impl Environment {
    pub fn validate(&self) -> Result<(), EnvironmentError> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(EnvironmentError::LatitudeOutOfRange(self.latitude_deg));
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(EnvironmentError::LongitudeOutOfRange(self.longitude_deg));
        }
        if !(self.rail_length_m >= 0.0) || !self.rail_length_m.is_finite() {
            return Err(EnvironmentError::InvalidRailLength(self.rail_length_m));
        }
        if !self.elevation_m.is_finite() {
            return Err(EnvironmentError::InvalidElevation(self.elevation_m));
        }
        Ok(())
    }
}
