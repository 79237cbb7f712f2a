// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from request validation, the store, or response building.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid filter `{field}`: {reason}")]
    InvalidFilter { field: &'static str, reason: String },

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Not Found")]
    RouteNotFound,

    #[error("{subject} is not rankable: {reason}")]
    NotRankable { subject: String, reason: String },

    #[error(
        "store unavailable during {operation}{}: {message}",
        .subject.as_deref().map(|s| format!(" ({s})")).unwrap_or_default()
    )]
    StoreUnavailable {
        operation: &'static str,
        subject: Option<String>,
        message: String,
    },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn invalid_filter(field: &'static str, reason: impl Into<String>) -> Self {
        ServerError::InvalidFilter {
            field,
            reason: reason.into(),
        }
    }

    /// Wraps a store failure with the name of the operation that issued the query.
    pub fn store(operation: &'static str, err: rusqlite::Error) -> Self {
        ServerError::StoreUnavailable {
            operation,
            subject: None,
            message: err.to_string(),
        }
    }

    /// Names the entity a store failure was about. Other errors pass through.
    pub fn for_subject(self, name: impl Into<String>) -> Self {
        match self {
            ServerError::StoreUnavailable {
                operation,
                subject: None,
                message,
            } => ServerError::StoreUnavailable {
                operation,
                subject: Some(name.into()),
                message,
            },
            other => other,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ServerError::InvalidFilter { .. } | ServerError::InvalidPagination(_) => 400,
            ServerError::NotFound(_) | ServerError::RouteNotFound => 404,
            ServerError::NotRankable { .. } => 404,
            ServerError::StoreUnavailable { .. } => 503,
            ServerError::Internal(_) => 500,
        }
    }

    /// Stable machine-readable label for the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidFilter { .. } => "invalid_filter",
            ServerError::InvalidPagination(_) => "invalid_pagination",
            ServerError::NotFound(_) | ServerError::RouteNotFound => "not_found",
            ServerError::NotRankable { .. } => "not_rankable",
            ServerError::StoreUnavailable { .. } => "store_unavailable",
            ServerError::Internal(_) => "internal",
        }
    }
}
