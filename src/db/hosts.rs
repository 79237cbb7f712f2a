use rusqlite::types::Value;

use crate::db::connection::Database;
use crate::db::{ensure_host, query_all, query_one};
use crate::domain::host::{HostProfile, HostProperty, HostRank, HostRanking};
use crate::errors::ServerError;
use crate::query::pagination::{Page, LIMIT_OFFSET};
use crate::query::predicate::{Cmp, Column, PredicateBuilder, Term};
use crate::query::ranking::{
    rank_expr, rank_of, HOSTS_IN_NEIGHBORHOOD, HOST_ORDER, HOST_STATS_CTE, LISTING_ORDER,
    MIN_HOST_LISTINGS, SAME_HOST,
};

const SQL_HOST_PROFILE: &str = include_str!("../../sql/host_profile.sql");

pub fn get_host_profile(db: &Database, host_id: i64) -> Result<HostProfile, ServerError> {
    db.with_conn(|conn| {
        query_one(
            conn,
            "get_host_profile",
            SQL_HOST_PROFILE,
            &[Value::Integer(host_id)],
            HostProfile::from_row,
        )?
        .ok_or_else(|| ServerError::NotFound(format!("host {host_id}")))
    })
    .map_err(|e| e.for_subject(format!("host {host_id}")))
}

/// The host's listings, ranked against each other.
pub fn get_host_properties(
    db: &Database,
    host_id: i64,
    page: Page,
) -> Result<Vec<HostProperty>, ServerError> {
    let sql = format!(
        "SELECT
            l.id AS property_id,
            l.name AS property_name,
            l.property_type,
            l.neighborhood,
            l.price,
            l.rating,
            l.review_count AS number_of_reviews,
            l.capacity,
            l.bedrooms,
            l.bathrooms,
            {} AS ranking_among_host_properties
        FROM listings AS l
        WHERE l.id_host = ?
        ORDER BY {}
        {LIMIT_OFFSET}",
        rank_expr(&SAME_HOST, &LISTING_ORDER, "l"),
        LISTING_ORDER.order_by("l", "id")
    );

    let mut params = vec![Value::Integer(host_id)];
    params.extend(page.bind());

    db.with_conn(|conn| {
        ensure_host(conn, host_id)?;
        query_all(conn, "get_host_properties", &sql, &params, HostProperty::from_row)
    })
    .map_err(|e| e.for_subject(format!("host {host_id}")))
}

/// Hosts with enough listings in a neighborhood, ranked within it.
pub fn host_ranking(
    db: &Database,
    neighborhood: Option<&str>,
    page: Page,
) -> Result<Vec<HostRanking>, ServerError> {
    if let Some(n) = neighborhood {
        if n.trim().is_empty() {
            return Err(ServerError::invalid_filter("neighborhood", "must not be empty"));
        }
    }

    let predicate = PredicateBuilder::new()
        .when(neighborhood, |n| {
            Term::compare(Column::HostStatsNeighborhood, Cmp::Eq, n.to_string())
        })
        .build();

    let sql = format!(
        "WITH {HOST_STATS_CTE}
        SELECT
            h.id AS host_id,
            h.name AS host_name,
            h.is_superhost,
            h.is_verified AS verified,
            hs.neighborhood,
            hs.total_properties,
            ROUND(hs.avg_rating, 2) AS avg_rating,
            hs.total_reviews,
            ROUND(hs.avg_price, 2) AS avg_price,
            {} AS neighborhood_host_rank
        FROM host_stats AS hs
        JOIN hosts AS h ON h.id = hs.id_host
        {}
        ORDER BY {}, hs.neighborhood ASC
        {LIMIT_OFFSET}",
        rank_expr(&HOSTS_IN_NEIGHBORHOOD, &HOST_ORDER, "hs"),
        predicate.where_clause(),
        HOST_ORDER.order_by("hs", "id_host")
    );
    let params = predicate.params_with(page.bind());

    db.with_conn(|conn| query_all(conn, "host_ranking", &sql, &params, HostRanking::from_row))
}

/// Rank of one host among the ranked hosts of `neighborhood`.
pub fn neighborhood_host_rank(
    db: &Database,
    host_id: i64,
    neighborhood: &str,
) -> Result<HostRank, ServerError> {
    if neighborhood.trim().is_empty() {
        return Err(ServerError::invalid_filter("neighborhood", "must not be empty"));
    }

    db.with_conn(|conn| {
        ensure_host(conn, host_id)?;

        let rank = rank_of(
            conn,
            "neighborhood_host_rank",
            &HOSTS_IN_NEIGHBORHOOD,
            &HOST_ORDER,
            "s.id_host = ? AND s.neighborhood = ?",
            &[Value::Integer(host_id), Value::Text(neighborhood.to_string())],
        )?;

        match rank {
            Some(neighborhood_host_rank) => Ok(HostRank {
                host_id,
                neighborhood: neighborhood.to_string(),
                neighborhood_host_rank,
            }),
            None => Err(ServerError::NotRankable {
                subject: format!("host {host_id}"),
                reason: format!(
                    "fewer than {MIN_HOST_LISTINGS} listings in {neighborhood}"
                ),
            }),
        }
    })
    .map_err(|e| e.for_subject(format!("host {host_id} in {neighborhood}")))
}
