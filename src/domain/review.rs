// src/domain/review.rs
use chrono::NaiveDate;
use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub review_id: i64,
    pub review_date: NaiveDate,
    pub comment: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub property_name: String,
    /// Reviews the author has written across all listings.
    pub user_total_reviews: i64,
}

impl Review {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            review_id: row.get("review_id")?,
            review_date: row.get("review_date")?,
            comment: row.get("comment")?,
            user_id: row.get("user_id")?,
            user_name: row.get("user_name")?,
            property_name: row.get("property_name")?,
            user_total_reviews: row.get("user_total_reviews")?,
        })
    }
}
