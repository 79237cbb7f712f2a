// src/query/pagination.rs
use rusqlite::types::Value;

use crate::errors::ServerError;
use crate::query::params::QueryParams;

/// Result kinds with a fixed page size. Clients choose only the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Search,
    BestDeals,
    HostRanking,
    Reviews,
    HostListings,
    Trending,
}

impl PageKind {
    pub const fn size(self) -> i64 {
        match self {
            PageKind::Search => 100,
            PageKind::BestDeals => 20,
            PageKind::HostRanking => 50,
            PageKind::Reviews => 10,
            PageKind::HostListings => 5,
            PageKind::Trending => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    kind: PageKind,
    offset: i64,
}

impl Page {
    pub fn first(kind: PageKind) -> Self {
        Self { kind, offset: 0 }
    }

    pub fn at(kind: PageKind, offset: i64) -> Result<Self, ServerError> {
        if offset < 0 {
            return Err(ServerError::InvalidPagination(format!(
                "offset must be >= 0, got {offset}"
            )));
        }
        Ok(Self { kind, offset })
    }

    /// Reads `offset` from the query string; absent means the first page.
    pub fn from_params(kind: PageKind, q: &QueryParams) -> Result<Self, ServerError> {
        match q.get("offset") {
            None => Ok(Self::first(kind)),
            Some(raw) => {
                let offset = raw.parse::<i64>().map_err(|_| {
                    ServerError::InvalidPagination(format!("offset must be an integer, got {raw:?}"))
                })?;
                Self::at(kind, offset)
            }
        }
    }

    pub fn limit(&self) -> i64 {
        self.kind.size()
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Values for a trailing `LIMIT ? OFFSET ?`.
    pub fn bind(&self) -> [Value; 2] {
        [Value::Integer(self.limit()), Value::Integer(self.offset())]
    }
}

pub const LIMIT_OFFSET: &str = "LIMIT ? OFFSET ?";
