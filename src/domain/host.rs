// src/domain/host.rs
use chrono::NaiveDate;
use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostProfile {
    pub host_id: i64,
    pub host_name: String,
    pub host_url: Option<String>,
    pub host_join_date: Option<NaiveDate>,
    pub host_description: Option<String>,
    pub is_superhost: bool,
    pub verified: bool,
    pub host_location: Option<String>,

    // Aggregates over the host's listings
    pub total_properties: i64,
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
}

impl HostProfile {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            host_id: row.get("host_id")?,
            host_name: row.get("host_name")?,
            host_url: row.get("host_url")?,
            host_join_date: row.get("host_join_date")?,
            host_description: row.get("host_description")?,
            is_superhost: row.get("is_superhost")?,
            verified: row.get("verified")?,
            host_location: row.get("host_location")?,
            total_properties: row.get("total_properties")?,
            average_rating: row.get("average_rating")?,
            total_reviews: row.get("total_reviews")?,
        })
    }
}

/// One of a host's listings, ranked against the host's other listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostProperty {
    pub property_id: i64,
    pub property_name: String,
    pub property_type: String,
    pub neighborhood: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub number_of_reviews: Option<i64>,
    pub capacity: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub ranking_among_host_properties: i64,
}

impl HostProperty {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            property_id: row.get("property_id")?,
            property_name: row.get("property_name")?,
            property_type: row.get("property_type")?,
            neighborhood: row.get("neighborhood")?,
            price: row.get("price")?,
            rating: row.get("rating")?,
            number_of_reviews: row.get("number_of_reviews")?,
            capacity: row.get("capacity")?,
            bedrooms: row.get("bedrooms")?,
            bathrooms: row.get("bathrooms")?,
            ranking_among_host_properties: row.get("ranking_among_host_properties")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostRanking {
    pub host_id: i64,
    pub host_name: String,
    pub is_superhost: bool,
    pub verified: bool,
    pub neighborhood: String,
    pub total_properties: i64,
    pub avg_rating: Option<f64>,
    pub total_reviews: i64,
    pub avg_price: Option<f64>,
    pub neighborhood_host_rank: i64,
}

impl HostRanking {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            host_id: row.get("host_id")?,
            host_name: row.get("host_name")?,
            is_superhost: row.get("is_superhost")?,
            verified: row.get("verified")?,
            neighborhood: row.get("neighborhood")?,
            total_properties: row.get("total_properties")?,
            avg_rating: row.get("avg_rating")?,
            total_reviews: row.get("total_reviews")?,
            avg_price: row.get("avg_price")?,
            neighborhood_host_rank: row.get("neighborhood_host_rank")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostRank {
    pub host_id: i64,
    pub neighborhood: String,
    pub neighborhood_host_rank: i64,
}
