// src/query/params.rs
use chrono::NaiveDate;
use std::str::FromStr;

use crate::errors::ServerError;

/// Decoded query-string pairs, in request order.
///
/// Blank values (`?min_price=`) are treated as absent, which is what browser
/// forms send for untouched inputs.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First non-blank value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-blank value for `key` (repeated keys are allowed).
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(String::from)
    }

    /// Parse an optional value, naming the field when it is malformed.
    pub fn parse_opt<T: FromStr>(
        &self,
        key: &'static str,
        expected: &str,
    ) -> Result<Option<T>, ServerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| ServerError::invalid_filter(key, format!("expected {expected}, got {raw:?}"))),
        }
    }

    pub fn bool_opt(&self, key: &'static str) -> Result<Option<bool>, ServerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                _ => Err(ServerError::invalid_filter(
                    key,
                    format!("expected a boolean, got {raw:?}"),
                )),
            },
        }
    }

    pub fn date_opt(&self, key: &'static str) -> Result<Option<NaiveDate>, ServerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    ServerError::invalid_filter(key, format!("expected YYYY-MM-DD, got {raw:?}"))
                }),
        }
    }
}
