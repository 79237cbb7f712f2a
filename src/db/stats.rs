use chrono::{Months, NaiveDate};
use rusqlite::types::Value;

use crate::db::connection::Database;
use crate::db::{query_all, query_one};
use crate::domain::stats::{NeighborhoodStats, OverviewStats, TrendingProperty};
use crate::errors::ServerError;
use crate::query::pagination::PageKind;
use crate::query::predicate::date_value;

const SQL_NEIGHBORHOOD_STATS: &str = include_str!("../../sql/neighborhood_stats.sql");
const SQL_OVERVIEW: &str = include_str!("../../sql/overview.sql");
const SQL_TRENDING: &str = include_str!("../../sql/trending.sql");

const TRENDING_WINDOW_MONTHS: u32 = 6;
const TRENDING_MIN_REVIEWS: i64 = 5;

pub fn neighborhood_stats(db: &Database) -> Result<Vec<NeighborhoodStats>, ServerError> {
    db.with_conn(|conn| {
        query_all(
            conn,
            "neighborhood_stats",
            SQL_NEIGHBORHOOD_STATS,
            &[],
            NeighborhoodStats::from_row,
        )
    })
}

pub fn overview(db: &Database) -> Result<OverviewStats, ServerError> {
    db.with_conn(|conn| {
        query_one(conn, "overview", SQL_OVERVIEW, &[], OverviewStats::from_row)?
            .ok_or_else(|| ServerError::Internal("overview query returned no row".into()))
    })
}

/// First day of the trailing window that ends on `today`.
pub fn trending_window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(TRENDING_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Listings with the most reviews in the trailing window ending on `today`.
pub fn trending_listings(
    db: &Database,
    today: NaiveDate,
) -> Result<Vec<TrendingProperty>, ServerError> {
    let params = [
        date_value(trending_window_start(today)),
        date_value(today),
        Value::Integer(TRENDING_MIN_REVIEWS),
        Value::Integer(PageKind::Trending.size()),
    ];

    db.with_conn(|conn| {
        query_all(
            conn,
            "trending_listings",
            SQL_TRENDING,
            &params,
            TrendingProperty::from_row,
        )
    })
}
