//! Banana analytics endpoint handlers.
//!
//! Each handler is a single call into the mock analytics generator; the
//! only request-level work is input validation and instrumentation.

use crate::{
    models::{BananaAnalytics, ProductionRecord, SalesQuery, SalesRecord},
    services::{
        AppMetrics,
        analytics::{self, ALL_REGIONS},
    },
    utils::sanitize_for_log,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Caller-supplied region text is cut to this many characters in logs
const MAX_LOGGED_REGION_LEN: usize = 64;

/// Log-safe copy of a caller-supplied region filter
fn logged_region(region: &str) -> String {
    sanitize_for_log(region, MAX_LOGGED_REGION_LEN)
}

fn record_operation(req: &HttpRequest, operation: &str) {
    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_analytics(operation);
    }
}

/// Full analytics endpoint
///
/// Production rows for the current year, sales rows for every country and
/// a summary computed from exactly those rows.
#[api_v2_operation(
    summary = "Banana Analytics",
    description = "Returns mock banana production and sales data for the current year together with summary totals consistent with the returned rows.",
    tags("Analytics"),
    responses(
        (status = 200, description = "Successful response", body = BananaAnalytics),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn get_analytics(req: HttpRequest) -> Result<web::Json<BananaAnalytics>, Error> {
    let analytics = tracing::info_span!("banana_analytics").in_scope(analytics::current_analytics);
    record_operation(&req, "summary");

    tracing::info!(
        year = analytics.summary.year,
        total_production_tons = analytics.summary.total_production_tons,
        top_producing_region = %analytics.summary.top_producing_region,
        "Generated banana analytics"
    );

    Ok(web::Json(analytics))
}

/// Production by year endpoint
#[api_v2_operation(
    summary = "Banana Production by Year",
    description = "Returns one mock production row per producing region and month of the given year.",
    tags("Analytics"),
    responses(
        (status = 200, description = "Array of production records"),
        (status = 400, description = "Bad Request - year out of range"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn get_production_by_year(
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<web::Json<Vec<ProductionRecord>>, Error> {
    let year = analytics::validate_year(path.into_inner())?;
    let rows = tracing::info_span!("banana_production", year)
        .in_scope(|| analytics::generate_production(year, &mut rand::thread_rng()));
    record_operation(&req, "production");

    tracing::info!(rows = rows.len(), "Generated production data");
    Ok(web::Json(rows))
}

/// Sales by region endpoint
#[api_v2_operation(
    summary = "Banana Sales by Region",
    description = "Returns mock sales rows for a market region (north-america, europe, asia), a single country, or all countries when no region is given.",
    tags("Analytics"),
    responses(
        (status = 200, description = "Array of sales records"),
        (status = 400, description = "Bad Request - unsafe content"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn get_sales_by_region(
    req: HttpRequest,
    query: web::Query<SalesQuery>,
) -> Result<web::Json<Vec<SalesRecord>>, Error> {
    let region = query.region.as_deref().unwrap_or(ALL_REGIONS);
    let logged_region = logged_region(region);
    let rows = tracing::info_span!("banana_sales", region = %logged_region)
        .in_scope(|| analytics::sales_by_region(Some(region), &mut rand::thread_rng()));
    record_operation(&req, "sales");

    tracing::info!(region = %logged_region, rows = rows.len(), "Generated sales data");
    Ok(web::Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_region_strips_line_breaks() {
        assert_eq!(logged_region("europe"), "europe");

        let forged = logged_region("europe\r\nINFO fake entry");
        assert!(!forged.contains('\n'));
        assert!(!forged.contains('\r'));

        let long = "x".repeat(200);
        assert!(logged_region(&long).chars().count() <= MAX_LOGGED_REGION_LEN + 3);
    }
}
