// src/domain/stats.rs
use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodStats {
    pub neighborhood: String,
    pub total_listings: i64,
    pub average_price: Option<f64>,
    pub average_rating: Option<f64>,
    pub average_capacity: Option<f64>,
    pub average_bedrooms: Option<f64>,
    pub average_bathrooms: Option<f64>,
    pub average_reviews: Option<f64>,
    pub superhost_count: i64,
    pub verified_count: i64,
}

impl NeighborhoodStats {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            neighborhood: row.get("neighborhood")?,
            total_listings: row.get("total_listings")?,
            average_price: row.get("average_price")?,
            average_rating: row.get("average_rating")?,
            average_capacity: row.get("average_capacity")?,
            average_bedrooms: row.get("average_bedrooms")?,
            average_bathrooms: row.get("average_bathrooms")?,
            average_reviews: row.get("average_reviews")?,
            superhost_count: row.get("superhost_count")?,
            verified_count: row.get("verified_count")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_properties: i64,
    pub total_hosts: i64,
    pub total_neighborhoods: i64,
    pub total_users: i64,
    pub overall_avg_price: Option<f64>,
    pub overall_avg_rating: Option<f64>,
    pub total_superhosts: i64,
    pub total_verified_hosts: i64,
    pub total_reviews: i64,
}

impl OverviewStats {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            total_properties: row.get("total_properties")?,
            total_hosts: row.get("total_hosts")?,
            total_neighborhoods: row.get("total_neighborhoods")?,
            total_users: row.get("total_users")?,
            overall_avg_price: row.get("overall_avg_price")?,
            overall_avg_rating: row.get("overall_avg_rating")?,
            total_superhosts: row.get("total_superhosts")?,
            total_verified_hosts: row.get("total_verified_hosts")?,
            total_reviews: row.get("total_reviews")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingProperty {
    pub property_id: i64,
    pub property_name: String,
    pub neighborhood: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub host_name: String,
    pub is_superhost: bool,
    pub recent_reviews_count: i64,
    pub unique_reviewers: i64,
    pub avg_comment_length: i64,
}

impl TrendingProperty {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            property_id: row.get("property_id")?,
            property_name: row.get("property_name")?,
            neighborhood: row.get("neighborhood")?,
            price: row.get("price")?,
            rating: row.get("rating")?,
            host_name: row.get("host_name")?,
            is_superhost: row.get("is_superhost")?,
            recent_reviews_count: row.get("recent_reviews_count")?,
            unique_reviewers: row.get("unique_reviewers")?,
            avg_comment_length: row.get("avg_comment_length")?,
        })
    }
}
