use crate::db::connection::Database;
use crate::db::{ensure_listing, query_all};
use crate::domain::review::Review;
use crate::errors::ServerError;
use crate::query::pagination::{Page, LIMIT_OFFSET};
use crate::query::predicate::{Cmp, Column, PredicateBuilder, Term};

/// A listing's reviews, newest first, optionally from `min_year` on.
pub fn get_property_reviews(
    db: &Database,
    listing_id: i64,
    min_year: Option<i32>,
    page: Page,
) -> Result<Vec<Review>, ServerError> {
    let predicate = PredicateBuilder::new()
        .push(Term::compare(Column::ReviewListing, Cmp::Eq, listing_id))
        .when(min_year, |y| Term::compare(Column::ReviewYear, Cmp::Ge, y))
        .build();

    let sql = format!(
        "SELECT
            r.id AS review_id,
            r.date AS review_date,
            r.comment,
            u.id AS user_id,
            u.name AS user_name,
            l.name AS property_name,
            (SELECT COUNT(*) FROM reviews AS r2 WHERE r2.id_user = u.id) AS user_total_reviews
        FROM reviews AS r
        JOIN users AS u ON u.id = r.id_user
        JOIN listings AS l ON l.id = r.id_listing
        {}
        ORDER BY r.date DESC, r.id DESC
        {LIMIT_OFFSET}",
        predicate.where_clause()
    );
    let params = predicate.params_with(page.bind());

    db.with_conn(|conn| {
        ensure_listing(conn, listing_id)?;
        query_all(conn, "get_property_reviews", &sql, &params, Review::from_row)
    })
    .map_err(|e| e.for_subject(format!("property {listing_id}")))
}
