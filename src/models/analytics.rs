//! Banana analytics records returned by the mock analytics warehouse.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Monthly production figures for one growing region
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub region: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub tons_produced: f64,
    /// 1.0-5.0
    pub quality_score: f64,
    pub variety_name: String,
    /// 0-100
    pub export_percentage: f64,
}

/// Sales into one importing country
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub country: String,
    pub total_sales: f64,
    pub total_units: u64,
    pub average_price: f64,
    /// Share of total sales across all countries, 0-100
    pub market_share_percent: f64,
}

/// Totals derived from the production and sales rows of the same response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub year: i32,
    pub total_production_tons: f64,
    /// Tons-weighted mean quality score
    pub average_quality_score: f64,
    pub total_revenue: f64,
    pub countries_served: usize,
    pub top_producing_region: String,
    pub most_popular_variety: String,
    pub generated_at: DateTime<Utc>,
}

/// Response body of `GET /api/analytics`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct BananaAnalytics {
    pub summary: AnalyticsSummary,
    pub productions: Vec<ProductionRecord>,
    pub sales: Vec<SalesRecord>,
}

/// Query parameters for the sales endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct SalesQuery {
    /// Market region slug, country name, or `all`
    pub region: Option<String>,
}
