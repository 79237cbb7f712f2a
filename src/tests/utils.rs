use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use astra::{Body, Response};
use http::{Method, Request};
use rusqlite::{params, Connection};
use std::io::Read;

use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::router::handle;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

static NEXT_FIXTURE: AtomicUsize = AtomicUsize::new(0);

/// A throwaway store on disk built from the production schema. The service
/// only ever reads it through a read-only [`Database`]; seeding happens on a
/// separate writable connection before that.
pub struct FixtureDb {
    path: PathBuf,
    db: Database,
}

impl FixtureDb {
    pub fn empty() -> Self {
        Self::with(|_| {})
    }

    pub fn with(seed: impl FnOnce(&Connection)) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "listing_insights_{}_{}_{}.sqlite3",
            std::process::id(),
            NEXT_FIXTURE.fetch_add(1, Ordering::SeqCst),
            nanos
        ));

        let conn = Connection::open(&path).expect("create fixture store");
        conn.execute_batch(SCHEMA).expect("apply schema");
        seed(&conn);
        drop(conn);

        let db = Database::new(path.to_string_lossy().into_owned());
        Self { path, db }
    }

    /// The shared sample data most router tests run against.
    pub fn seeded() -> Self {
        Self::with(seed_sample)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Drop for FixtureDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn host(conn: &Connection, id: i64, name: &str, superhost: bool, verified: bool) {
    conn.execute(
        "insert into hosts (id, name, url, join_date, description, is_superhost, is_verified, location)
         values (?, ?, ?, '2019-04-02', 'Hi!', ?, ?, 'Rio de Janeiro')",
        params![id, name, format!("https://example.com/users/{id}"), superhost, verified],
    )
    .unwrap();
}

pub fn listing(
    conn: &Connection,
    id: i64,
    host: i64,
    neighborhood: &str,
    price: Option<f64>,
    rating: Option<f64>,
    reviews: Option<i64>,
) {
    conn.execute(
        "insert into listings (id, name, description, property_type, room_type, capacity, bedrooms,
                               beds, bathrooms, neighborhood, latitude, longitude, price, rating,
                               review_count, url, id_host)
         values (?, ?, 'A place', 'Apartment', 'Entire home/apt', 4, 2, 2, 1.5, ?, -22.97, -43.18,
                 ?, ?, ?, ?, ?)",
        params![
            id,
            format!("Listing {id}"),
            neighborhood,
            price,
            rating,
            reviews,
            format!("https://example.com/rooms/{id}"),
            host
        ],
    )
    .unwrap();
}

pub fn locate(conn: &Connection, id: i64, lat: Option<f64>, lng: Option<f64>) {
    conn.execute(
        "update listings set latitude = ?, longitude = ? where id = ?",
        params![lat, lng, id],
    )
    .unwrap();
}

pub fn amenities(conn: &Connection, listing: i64, names: &[&str]) {
    for name in names {
        conn.execute(
            "insert into amenities (id_listing, name) values (?, ?)",
            params![listing, name],
        )
        .unwrap();
    }
}

pub fn calendar(conn: &Connection, listing: i64, date: &str, available: bool) {
    conn.execute(
        "insert into calendar (date, id_listing, available) values (?, ?, ?)",
        params![date, listing, available],
    )
    .unwrap();
}

pub fn user(conn: &Connection, id: i64, name: &str) {
    conn.execute("insert into users (id, name) values (?, ?)", params![id, name])
        .unwrap();
}

pub fn review(conn: &Connection, id: i64, listing: i64, user: i64, date: &str, comment: Option<&str>) {
    conn.execute(
        "insert into reviews (id, date, comment, id_user, id_listing) values (?, ?, ?, ?, ?)",
        params![id, date, comment, user, listing],
    )
    .unwrap();
}

/// Hosts:
///   1 Ana    superhost, verified   Centro: 1, 7   Sul: 4, 5
///   2 Bruno  verified              Centro: 2, 8   Norte: 6 (no coordinates)
///   3 Carla  -                     Centro: 3
///   4 Diego  -                     no listings
fn seed_sample(conn: &Connection) {
    host(conn, 1, "Ana", true, true);
    host(conn, 2, "Bruno", false, true);
    host(conn, 3, "Carla", false, false);
    host(conn, 4, "Diego", false, false);

    listing(conn, 1, 1, "Centro", Some(150.0), Some(4.8), Some(120));
    listing(conn, 2, 2, "Centro", Some(120.0), Some(4.8), Some(80));
    listing(conn, 3, 3, "Centro", Some(90.0), Some(4.5), Some(200));
    listing(conn, 4, 1, "Sul", Some(300.0), Some(4.9), Some(10));
    listing(conn, 5, 1, "Sul", Some(200.0), None, None);
    listing(conn, 6, 2, "Norte", Some(50.0), Some(3.9), Some(5));
    listing(conn, 7, 1, "Centro", Some(250.0), Some(4.0), Some(30));
    listing(conn, 8, 2, "Centro", Some(180.0), Some(4.6), Some(40));
    locate(conn, 6, None, None);

    amenities(conn, 1, &["Air conditioning", "Kitchen", "Pool", "Wifi"]);
    amenities(conn, 2, &["Kitchen", "Pool", "Wifi"]);
    amenities(conn, 3, &["Wifi"]);
    amenities(conn, 4, &["Kitchen", "Pool", "TV", "Wifi"]);
    amenities(conn, 8, &["Kitchen", "Wifi"]);

    calendar(conn, 1, "2024-03-01", true);
    calendar(conn, 1, "2024-03-02", true);
    calendar(conn, 1, "2024-03-03", true);
    calendar(conn, 1, "2024-03-04", false);
    calendar(conn, 2, "2024-03-01", true);
    calendar(conn, 2, "2024-03-02", false);
    calendar(conn, 2, "2024-03-03", true);

    user(conn, 1, "Maria");
    user(conn, 2, "João");
    user(conn, 3, "Pedro");

    review(conn, 1, 1, 1, "2023-05-10", Some("Great place"));
    review(conn, 2, 1, 2, "2024-01-15", Some("Nice"));
    review(conn, 3, 1, 1, "2024-02-20", None);
    review(conn, 4, 3, 3, "2022-11-01", Some("Ok"));
}

/// GET `uri` through the router, turning errors into their HTTP responses.
pub fn get(db: &Database, uri: &str) -> Response {
    request(db, Method::GET, uri)
}

pub fn request(db: &Database, method: Method, uri: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    match handle(req, db) {
        Ok(resp) => resp,
        Err(err) => crate::responses::error_to_response(&err),
    }
}

pub fn json_body(resp: Response) -> serde_json::Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}

/// GET `uri`, assert a 200 and return the parsed body.
pub fn get_json(db: &Database, uri: &str) -> serde_json::Value {
    let resp = get(db, uri);
    assert_eq!(resp.status(), 200, "GET {uri}");
    json_body(resp)
}

/// GET `uri` expecting the router to fail, and return the error.
pub fn get_err(db: &Database, uri: &str) -> ServerError {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    match handle(req, db) {
        Ok(resp) => panic!("expected an error for {uri}, got {}", resp.status()),
        Err(err) => err,
    }
}

/// `key` of every element of a JSON array.
pub fn ids(body: &serde_json::Value, key: &str) -> Vec<i64> {
    body.as_array()
        .unwrap_or_else(|| panic!("expected an array: {body}"))
        .iter()
        .map(|row| row[key].as_i64().unwrap())
        .collect()
}
