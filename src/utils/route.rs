//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label for requests that matched no registered route
pub const UNMATCHED_ROUTE: &str = "/unmatched";

/// Extract the matched route pattern for use as a metrics label.
///
/// Parameterised routes collapse to their pattern (for example
/// `/api/analytics/production/{year}`) to keep label cardinality bounded.
/// Unmatched paths share a single label for the same reason.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
