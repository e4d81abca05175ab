//! Mock banana analytics generator.
//!
//! Stands in for a data warehouse query: fixed region, variety and
//! country lists crossed with random but plausible figures. The summary is
//! always computed from the exact rows returned alongside it.

use crate::{
    error::ApiError,
    models::{AnalyticsSummary, BananaAnalytics, ProductionRecord, SalesRecord},
};
use chrono::{Datelike, Utc};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Growing regions, one production row per region and month
pub const PRODUCING_REGIONS: [&str; 6] = [
    "Ecuador",
    "Philippines",
    "Costa Rica",
    "Colombia",
    "Guatemala",
    "India",
];

pub const VARIETIES: [&str; 6] = [
    "Cavendish",
    "Gros Michel",
    "Lady Finger",
    "Red Dacca",
    "Blue Java",
    "Plantain",
];

/// Importing countries and the market region each belongs to
pub const SALES_MARKETS: [(&str, &str); 8] = [
    ("United States", "north-america"),
    ("Canada", "north-america"),
    ("Germany", "europe"),
    ("United Kingdom", "europe"),
    ("France", "europe"),
    ("Netherlands", "europe"),
    ("Japan", "asia"),
    ("China", "asia"),
];

/// Region filter value meaning "no filter"
pub const ALL_REGIONS: &str = "all";

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Reject years outside the supported range
pub fn validate_year(year: i32) -> Result<i32, ApiError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ApiError::validation(format!(
            "Year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One row per producing region and month of `year`
pub fn generate_production<R: Rng>(year: i32, rng: &mut R) -> Vec<ProductionRecord> {
    let mut rows = Vec::with_capacity(PRODUCING_REGIONS.len() * 12);

    for region in PRODUCING_REGIONS {
        for month in 1..=12 {
            rows.push(ProductionRecord {
                region: region.to_string(),
                year,
                month,
                tons_produced: round_to(rng.gen_range(800.0..5000.0), 2),
                quality_score: round_to(rng.gen_range(1.0..=5.0), 1),
                variety_name: VARIETIES[rng.gen_range(0..VARIETIES.len())].to_string(),
                export_percentage: round_to(rng.gen_range(40.0..=95.0), 1),
            });
        }
    }

    rows
}

/// One row per importing country; market shares sum to 100 across the set
pub fn generate_sales<R: Rng>(rng: &mut R) -> Vec<SalesRecord> {
    let raw: Vec<(&str, f64, u64)> = SALES_MARKETS
        .iter()
        .map(|(country, _)| {
            let total_sales = round_to(rng.gen_range(1_000_000.0..50_000_000.0), 2);
            let total_units = rng.gen_range(100_000..10_000_000);
            (*country, total_sales, total_units)
        })
        .collect();

    let grand_total: f64 = raw.iter().map(|(_, sales, _)| sales).sum();

    raw.into_iter()
        .map(|(country, total_sales, total_units)| SalesRecord {
            country: country.to_string(),
            total_sales,
            total_units,
            average_price: round_to(total_sales / total_units as f64, 4),
            market_share_percent: if grand_total > 0.0 {
                total_sales / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Whether a sales country falls under the requested region filter
fn matches_region(country: &str, market: &str, region: &str) -> bool {
    region.eq_ignore_ascii_case(ALL_REGIONS)
        || region.eq_ignore_ascii_case(market)
        || region.eq_ignore_ascii_case(&market.replace('-', " "))
        || region.eq_ignore_ascii_case(country)
}

/// Sales rows for a market region slug, a country name, or `all`
pub fn sales_by_region<R: Rng>(region: Option<&str>, rng: &mut R) -> Vec<SalesRecord> {
    let region = region
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(ALL_REGIONS);

    generate_sales(rng)
        .into_iter()
        .filter(|record| {
            SALES_MARKETS
                .iter()
                .find(|(country, _)| *country == record.country)
                .is_some_and(|(country, market)| matches_region(country, market, region))
        })
        .collect()
}

/// Key with the largest accumulated value; ties resolve to the first key in order
fn arg_max(totals: &BTreeMap<&str, f64>) -> String {
    totals
        .iter()
        .fold(None::<(&str, f64)>, |best, (key, value)| match best {
            Some((_, best_value)) if best_value >= *value => best,
            _ => Some((*key, *value)),
        })
        .map(|(key, _)| key.to_string())
        .unwrap_or_default()
}

/// Summarise exactly the given rows
pub fn summarize(
    year: i32,
    productions: &[ProductionRecord],
    sales: &[SalesRecord],
) -> AnalyticsSummary {
    let total_production_tons: f64 = productions.iter().map(|p| p.tons_produced).sum();

    let weighted_quality: f64 = productions
        .iter()
        .map(|p| p.quality_score * p.tons_produced)
        .sum();
    let average_quality_score = if total_production_tons > 0.0 {
        round_to(weighted_quality / total_production_tons, 2)
    } else {
        0.0
    };

    let mut tons_by_region: BTreeMap<&str, f64> = BTreeMap::new();
    let mut tons_by_variety: BTreeMap<&str, f64> = BTreeMap::new();
    for p in productions {
        *tons_by_region.entry(p.region.as_str()).or_default() += p.tons_produced;
        *tons_by_variety.entry(p.variety_name.as_str()).or_default() += p.tons_produced;
    }

    let countries_served = sales
        .iter()
        .map(|s| s.country.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    AnalyticsSummary {
        year,
        total_production_tons,
        average_quality_score,
        total_revenue: sales.iter().map(|s| s.total_sales).sum(),
        countries_served,
        top_producing_region: arg_max(&tons_by_region),
        most_popular_variety: arg_max(&tons_by_variety),
        generated_at: Utc::now(),
    }
}

/// Full analytics for `year`: production rows, sales rows and their summary
pub fn generate_analytics<R: Rng>(year: i32, rng: &mut R) -> BananaAnalytics {
    let productions = generate_production(year, rng);
    let sales = generate_sales(rng);
    let summary = summarize(year, &productions, &sales);

    BananaAnalytics {
        summary,
        productions,
        sales,
    }
}

/// Full analytics for the current UTC year
pub fn current_analytics() -> BananaAnalytics {
    generate_analytics(Utc::now().year(), &mut rand::thread_rng())
}
