use rusqlite::{Connection, OpenFlags};
use std::cell::RefCell;
use std::time::Duration;

use crate::errors::ServerError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Thread-local connection slot, remembered together with the path it was opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = const { RefCell::new(None) };
}

/// Handle to the read-only listings store.
///
/// Each server worker lazily opens its own connection, so requests never share
/// a connection across threads.
#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open or fetch the per-thread read-only connection and run `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Connection) -> Result<T, ServerError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();

                let stale = match slot.as_ref() {
                    Some((path, _)) => path != &self.path,
                    None => true,
                };
                if stale {
                    *slot = Some((self.path.clone(), open_read_only(&self.path)?));
                }

                match slot.as_ref() {
                    Some((_, conn)) => f(conn),
                    None => Err(ServerError::Internal("connection slot empty".into())),
                }
            })
            .map_err(|_| ServerError::Internal("thread-local connection unavailable".into()))?
    }

    /// Round-trips a trivial query; used by the health check.
    pub fn ping(&self) -> Result<(), ServerError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))
                .map_err(|e| ServerError::store("ping", e))?;
            Ok(())
        })
    }
}

fn open_read_only(path: &str) -> Result<Connection, ServerError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;

    let conn =
        Connection::open_with_flags(path, flags).map_err(|e| ServerError::store("open", e))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| ServerError::store("open", e))?;

    tracing::debug!(path, "opened read-only store connection");
    Ok(conn)
}
