pub mod connection;
pub mod heatmap;
pub mod hosts;
pub mod listings;
pub mod reviews;
pub mod stats;

pub use connection::Database;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::errors::ServerError;

/// Run `sql` and map every row, tagging failures with `operation`.
pub(crate) fn query_all<T, F>(
    conn: &Connection,
    operation: &'static str,
    sql: &str,
    params: &[Value],
    map: F,
) -> Result<Vec<T>, ServerError>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::debug!(operation, params = params.len(), "query");

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ServerError::store(operation, e))?;

    let rows = stmt
        .query_map(params_from_iter(params), map)
        .map_err(|e| ServerError::store(operation, e))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::store(operation, e))?);
    }
    Ok(out)
}

/// Like [`query_all`] for queries that yield at most one row.
pub(crate) fn query_one<T, F>(
    conn: &Connection,
    operation: &'static str,
    sql: &str,
    params: &[Value],
    map: F,
) -> Result<Option<T>, ServerError>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::debug!(operation, params = params.len(), "query");

    conn.query_row(sql, params_from_iter(params), map)
        .optional()
        .map_err(|e| ServerError::store(operation, e))
}

/// Fails with `NotFound` unless a listing with `id` exists.
pub(crate) fn ensure_listing(conn: &Connection, id: i64) -> Result<(), ServerError> {
    ensure_row(conn, "find_listing", "SELECT 1 FROM listings WHERE id = ?", id)
        .and_then(|found| found.ok_or_else(|| ServerError::NotFound(format!("property {id}"))))
}

/// Fails with `NotFound` unless a host with `id` exists.
pub(crate) fn ensure_host(conn: &Connection, id: i64) -> Result<(), ServerError> {
    ensure_row(conn, "find_host", "SELECT 1 FROM hosts WHERE id = ?", id)
        .and_then(|found| found.ok_or_else(|| ServerError::NotFound(format!("host {id}"))))
}

fn ensure_row(
    conn: &Connection,
    operation: &'static str,
    sql: &str,
    id: i64,
) -> Result<Option<()>, ServerError> {
    query_one(conn, operation, sql, &[Value::Integer(id)], |_| Ok(()))
}
