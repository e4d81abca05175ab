//! Weather forecast value types.

use crate::error::ApiError;
use chrono::NaiveDate;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Lowest representable temperature, in whole degrees Celsius
pub const ABSOLUTE_ZERO_CELSIUS: i32 = -273;

/// A single day of forecast.
///
/// Fields are private so an entry can only be built through
/// [`ForecastEntry::new`], which enforces the absolute zero floor and
/// derives the Fahrenheit reading once.
#[derive(Clone, Debug, PartialEq, Serialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    date: NaiveDate,
    temperature_celsius: i32,
    temperature_fahrenheit: i32,
    summary: Option<String>,
}

impl ForecastEntry {
    /// Build an entry, rejecting temperatures below absolute zero
    pub fn new(
        date: NaiveDate,
        temperature_celsius: i32,
        summary: Option<String>,
    ) -> Result<Self, ApiError> {
        if temperature_celsius < ABSOLUTE_ZERO_CELSIUS {
            return Err(ApiError::validation(format!(
                "Temperature {temperature_celsius}°C is below absolute zero ({ABSOLUTE_ZERO_CELSIUS}°C)"
            )));
        }

        Ok(Self {
            date,
            temperature_celsius,
            temperature_fahrenheit: celsius_to_fahrenheit(temperature_celsius),
            summary,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn temperature_celsius(&self) -> i32 {
        self.temperature_celsius
    }

    pub fn temperature_fahrenheit(&self) -> i32 {
        self.temperature_fahrenheit
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// `32 + round(C × 9/5)`
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    32 + (f64::from(celsius) * 9.0 / 5.0).round() as i32
}

/// Query parameters for the weather forecast endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastQuery {
    /// Number of days to forecast, starting tomorrow
    pub days: Option<i64>,
}
