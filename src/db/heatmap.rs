use crate::db::connection::Database;
use crate::db::query_all;
use crate::domain::heatmap::HeatmapPoint;
use crate::errors::ServerError;
use crate::query::filters::SearchFilters;
use crate::query::normalize::min_max;
use crate::query::predicate::{Column, Term};

fn located() -> [Term; 2] {
    [Term::NotNull(Column::Latitude), Term::NotNull(Column::Longitude)]
}

/// One point per located listing, each with intensity 1.
pub fn density(db: &Database, filters: &SearchFilters) -> Result<Vec<HeatmapPoint>, ServerError> {
    let predicate = filters.predicate(located())?;
    let sql = format!(
        "SELECT l.latitude, l.longitude
        FROM listings AS l
        JOIN hosts AS h ON h.id = l.id_host
        {}
        ORDER BY l.id",
        predicate.where_clause()
    );

    db.with_conn(|conn| {
        query_all(conn, "heatmap_density", &sql, predicate.params(), |row| {
            Ok(HeatmapPoint {
                lat: row.get(0)?,
                lng: row.get(1)?,
                intensity: 1.0,
                price: None,
            })
        })
    })
}

/// Located, priced listings with price scaled into [0, 1] over the filtered set.
pub fn price(db: &Database, filters: &SearchFilters) -> Result<Vec<HeatmapPoint>, ServerError> {
    let [lat, lng] = located();
    let predicate = filters.predicate([lat, lng, Term::NotNull(Column::Price)])?;
    let sql = format!(
        "SELECT
            l.latitude,
            l.longitude,
            l.price,
            MIN(l.price) OVER () AS min_price,
            MAX(l.price) OVER () AS max_price
        FROM listings AS l
        JOIN hosts AS h ON h.id = l.id_host
        {}
        ORDER BY l.id",
        predicate.where_clause()
    );

    db.with_conn(|conn| {
        query_all(conn, "heatmap_price", &sql, predicate.params(), |row| {
            let price: f64 = row.get(2)?;
            Ok(HeatmapPoint {
                lat: row.get(0)?,
                lng: row.get(1)?,
                intensity: min_max(price, row.get(3)?, row.get(4)?),
                price: Some(price),
            })
        })
    })
}
