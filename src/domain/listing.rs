// src/domain/listing.rs
use chrono::NaiveDate;
use rusqlite::Row;
use serde::Serialize;

/// A listing as returned by search: listing columns, its host, and its
/// standing in its neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub property_id: i64,
    pub property_name: String,
    pub property_description: Option<String>,
    pub property_type: String,
    pub capacity: i64,
    pub bedrooms: i64,
    pub beds: i64,
    pub bathrooms: f64,
    pub neighborhood: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub listing_url: String,
    pub rating: Option<f64>,
    pub number_of_reviews: Option<i64>,

    // Host
    pub host_id: i64,
    pub host_name: String,
    pub is_superhost: bool,
    pub verified: bool,
    pub host_join_date: Option<NaiveDate>,

    pub neighborhood_ranking: i64,
}

impl Listing {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            property_id: row.get("property_id")?,
            property_name: row.get("property_name")?,
            property_description: row.get("property_description")?,
            property_type: row.get("property_type")?,
            capacity: row.get("capacity")?,
            bedrooms: row.get("bedrooms")?,
            beds: row.get("beds")?,
            bathrooms: row.get("bathrooms")?,
            neighborhood: row.get("neighborhood")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            room_type: row.get("room_type")?,
            price: row.get("price")?,
            listing_url: row.get("listing_url")?,
            rating: row.get("rating")?,
            number_of_reviews: row.get("number_of_reviews")?,
            host_id: row.get("host_id")?,
            host_name: row.get("host_name")?,
            is_superhost: row.get("is_superhost")?,
            verified: row.get("verified")?,
            host_join_date: row.get("host_join_date")?,
            neighborhood_ranking: row.get("neighborhood_ranking")?,
        })
    }
}

/// Single-listing view: the search record plus its rank among the host's
/// listings and its amenity names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub ranking_among_host_properties: i64,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRank {
    pub property_id: i64,
    pub neighborhood_ranking: i64,
    pub ranking_among_host_properties: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amenity {
    pub amenity_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityDate {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestDeal {
    pub property_id: i64,
    pub property_name: String,
    pub listing_url: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub neighborhood: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenities_count: i64,
    pub host_name: String,
    pub host_verified: bool,
}

impl BestDeal {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            property_id: row.get("property_id")?,
            property_name: row.get("property_name")?,
            listing_url: row.get("listing_url")?,
            price: row.get("price")?,
            rating: row.get("rating")?,
            neighborhood: row.get("neighborhood")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            amenities_count: row.get("amenities_count")?,
            host_name: row.get("host_name")?,
            host_verified: row.get("host_verified")?,
        })
    }
}
