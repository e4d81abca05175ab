//! Weather forecast endpoint handler.

use crate::{
    config::ForecastConfig,
    error::ApiError,
    models::{ForecastEntry, ForecastQuery},
    services::{AppMetrics, forecast::forecast_from_today},
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Validate the requested day count against the configured bounds
pub fn resolve_days(requested: Option<i64>, config: &ForecastConfig) -> Result<u32, ApiError> {
    let days = requested.unwrap_or(i64::from(config.default_days));

    if days < 0 || days > i64::from(config.max_days) {
        return Err(ApiError::validation(format!(
            "days must be between 0 and {}",
            config.max_days
        )));
    }

    Ok(days as u32)
}

/// Weather forecast endpoint
///
/// Returns one randomly generated entry per day, starting tomorrow.
#[api_v2_operation(
    summary = "Weather Forecast",
    description = "Returns a mock weather forecast with one entry per day starting tomorrow. Defaults to 5 days.",
    tags("Weather"),
    responses(
        (status = 200, description = "Array of forecast entries"),
        (status = 400, description = "Bad Request - days out of range or unsafe content"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn get_weather_forecast(
    req: HttpRequest,
    query: web::Query<ForecastQuery>,
) -> Result<web::Json<Vec<ForecastEntry>>, Error> {
    let default_config = ForecastConfig::default();
    let config = req
        .app_data::<web::Data<ForecastConfig>>()
        .map(|c| c.get_ref())
        .unwrap_or(&default_config);

    let days = resolve_days(query.days, config)?;

    let span = tracing::info_span!("weather_forecast", days);
    let forecast = span.in_scope(|| forecast_from_today(days))?;

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_forecast(forecast.len());
    }
    tracing::info!(entries = forecast.len(), "Generated weather forecast");

    Ok(web::Json(forecast))
}
