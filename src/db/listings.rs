use rusqlite::types::Value;
use rusqlite::Connection;

use crate::db::connection::Database;
use crate::db::{ensure_listing, query_all, query_one};
use crate::domain::listing::{
    Amenity, AvailabilityDate, BestDeal, Listing, ListingDetail, ListingRank,
};
use crate::errors::ServerError;
use crate::query::filters::{DealFilters, SearchFilters};
use crate::query::pagination::{Page, LIMIT_OFFSET};
use crate::query::predicate::{Column, Term};
use crate::query::ranking::{
    rank_expr, rank_of, PeerGroup, LISTING_ORDER, SAME_HOST, SAME_NEIGHBORHOOD,
};

/// Listing and host columns under their external names. Expects `l` and `h`.
const LISTING_COLUMNS: &str = "
    l.id AS property_id,
    l.name AS property_name,
    l.description AS property_description,
    l.property_type,
    l.capacity,
    l.bedrooms,
    l.beds,
    l.bathrooms,
    l.neighborhood,
    l.latitude,
    l.longitude,
    l.room_type,
    l.price,
    l.url AS listing_url,
    l.rating,
    l.review_count AS number_of_reviews,
    h.id AS host_id,
    h.name AS host_name,
    h.is_superhost,
    h.is_verified AS verified,
    h.join_date AS host_join_date";

fn listing_select() -> String {
    format!(
        "SELECT {LISTING_COLUMNS},
            {} AS neighborhood_ranking
        FROM listings AS l
        JOIN hosts AS h ON h.id = l.id_host",
        rank_expr(&SAME_NEIGHBORHOOD, &LISTING_ORDER, "l")
    )
}

/// Filtered listings with coordinates, best rated first.
pub fn search_listings(
    db: &Database,
    filters: &SearchFilters,
    page: Page,
) -> Result<Vec<Listing>, ServerError> {
    let predicate = filters.predicate([
        Term::NotNull(Column::Latitude),
        Term::NotNull(Column::Longitude),
    ])?;

    let sql = format!(
        "{} {} ORDER BY {} {LIMIT_OFFSET}",
        listing_select(),
        predicate.where_clause(),
        LISTING_ORDER.order_by("l", "id")
    );
    let params = predicate.params_with(page.bind());

    db.with_conn(|conn| query_all(conn, "search_listings", &sql, &params, Listing::from_row))
}

pub fn get_listing_detail(db: &Database, id: i64) -> Result<ListingDetail, ServerError> {
    let sql = format!("{} WHERE l.id = ?", listing_select());

    db.with_conn(|conn| {
        let listing = query_one(conn, "get_listing", &sql, &[Value::Integer(id)], Listing::from_row)?
            .ok_or_else(|| ServerError::NotFound(format!("property {id}")))?;

        let ranking_among_host_properties = listing_rank(conn, &SAME_HOST, id)?;
        let amenities = amenity_names(conn, id)?;

        Ok(ListingDetail {
            listing,
            ranking_among_host_properties,
            amenities,
        })
    })
    .map_err(|e| e.for_subject(format!("property {id}")))
}

/// Both ranks of one listing.
pub fn get_listing_rank(db: &Database, id: i64) -> Result<ListingRank, ServerError> {
    db.with_conn(|conn| {
        Ok(ListingRank {
            property_id: id,
            neighborhood_ranking: listing_rank(conn, &SAME_NEIGHBORHOOD, id)?,
            ranking_among_host_properties: listing_rank(conn, &SAME_HOST, id)?,
        })
    })
    .map_err(|e| e.for_subject(format!("property {id}")))
}

fn listing_rank(conn: &Connection, peers: &PeerGroup, id: i64) -> Result<i64, ServerError> {
    rank_of(conn, "listing_rank", peers, &LISTING_ORDER, "s.id = ?", &[Value::Integer(id)])?
        .ok_or_else(|| ServerError::NotFound(format!("property {id}")))
}

fn amenity_names(conn: &Connection, id: i64) -> Result<Vec<String>, ServerError> {
    query_all(
        conn,
        "get_amenities",
        "SELECT name FROM amenities WHERE id_listing = ? ORDER BY name",
        &[Value::Integer(id)],
        |row| row.get(0),
    )
}

pub fn get_amenities(db: &Database, id: i64) -> Result<Vec<Amenity>, ServerError> {
    db.with_conn(|conn| {
        ensure_listing(conn, id)?;
        let names = amenity_names(conn, id)?;
        Ok(names
            .into_iter()
            .map(|amenity_name| Amenity { amenity_name })
            .collect())
    })
    .map_err(|e| e.for_subject(format!("property {id}")))
}

/// Dates the listing is marked available, ascending.
pub fn get_availability(db: &Database, id: i64) -> Result<Vec<AvailabilityDate>, ServerError> {
    db.with_conn(|conn| {
        ensure_listing(conn, id)?;
        query_all(
            conn,
            "get_availability",
            "SELECT date FROM calendar WHERE id_listing = ? AND available = 1 ORDER BY date",
            &[Value::Integer(id)],
            |row| Ok(AvailabilityDate { date: row.get(0)? }),
        )
    })
    .map_err(|e| e.for_subject(format!("property {id}")))
}

/// Verified-host listings under the price cap with enough amenities.
pub fn best_deals(
    db: &Database,
    filters: &DealFilters,
    page: Page,
) -> Result<Vec<BestDeal>, ServerError> {
    let predicate = filters.predicate()?;

    let sql = format!(
        "SELECT
            l.id AS property_id,
            l.name AS property_name,
            l.url AS listing_url,
            l.price,
            l.rating,
            l.neighborhood,
            l.latitude,
            l.longitude,
            COUNT(am.name) AS amenities_count,
            h.name AS host_name,
            h.is_verified AS host_verified
        FROM listings AS l
        JOIN hosts AS h ON h.id = l.id_host
        LEFT JOIN amenities AS am ON am.id_listing = l.id
        {}
        GROUP BY l.id
        HAVING COUNT(am.name) >= ?
        ORDER BY IFNULL(l.rating, -1) DESC, amenities_count DESC, l.price ASC, l.id ASC
        {LIMIT_OFFSET}",
        predicate.where_clause()
    );

    let mut params = predicate.params().to_vec();
    params.push(Value::Integer(filters.min_amenities));
    params.extend(page.bind());

    db.with_conn(|conn| query_all(conn, "best_deals", &sql, &params, BestDeal::from_row))
}
