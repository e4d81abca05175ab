//! Mock weather forecast generator.

use crate::{error::ApiError, models::ForecastEntry};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;

/// Summary labels picked uniformly for each forecast day
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Generated temperatures fall in `[MIN_TEMPERATURE_C, MAX_TEMPERATURE_C)`
pub const MIN_TEMPERATURE_C: i32 = -20;
pub const MAX_TEMPERATURE_C: i32 = 55;

/// Generate `days` forecast entries dated `today + 1` through `today + days`.
///
/// Every call draws fresh values from `rng`; nothing is cached.
pub fn generate_forecast<R: Rng>(
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Vec<ForecastEntry>, ApiError> {
    (1..=days)
        .map(|offset| {
            let date = today
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or_else(|| ApiError::Internal(format!("date overflow at +{offset} days")))?;
            let temperature = rng.gen_range(MIN_TEMPERATURE_C..MAX_TEMPERATURE_C);
            let summary = SUMMARIES[rng.gen_range(0..SUMMARIES.len())];

            ForecastEntry::new(date, temperature, Some(summary.to_string()))
        })
        .collect()
}

/// Generate a forecast starting tomorrow (UTC) using the thread-local RNG
pub fn forecast_from_today(days: u32) -> Result<Vec<ForecastEntry>, ApiError> {
    let today = Utc::now().date_naive();
    generate_forecast(days, today, &mut rand::thread_rng())
}
