// src/query/predicate.rs
//
// Composable WHERE conditions. Terms only ever bind values as `?` parameters;
// column expressions come from the closed `Column` set below.
//
// Table aliases assumed by the column expressions:
//   l = listings, h = hosts, r = reviews, hs = host_stats

use chrono::NaiveDate;
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Price,
    Rating,
    Capacity,
    ReviewCount,
    Latitude,
    Longitude,
    Neighborhood,
    PropertyType,
    RoomType,
    HostSuperhost,
    HostVerified,
    ReviewListing,
    ReviewYear,
    HostStatsNeighborhood,
}

impl Column {
    pub fn sql(self) -> &'static str {
        match self {
            Column::Price => "l.price",
            Column::Rating => "l.rating",
            Column::Capacity => "l.capacity",
            // A listing without a count has no reviews.
            Column::ReviewCount => "IFNULL(l.review_count, 0)",
            Column::Latitude => "l.latitude",
            Column::Longitude => "l.longitude",
            Column::Neighborhood => "l.neighborhood",
            Column::PropertyType => "l.property_type",
            Column::RoomType => "l.room_type",
            Column::HostSuperhost => "h.is_superhost",
            Column::HostVerified => "h.is_verified",
            Column::ReviewListing => "r.id_listing",
            Column::ReviewYear => "CAST(strftime('%Y', r.date) AS INTEGER)",
            Column::HostStatsNeighborhood => "hs.neighborhood",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ge,
    Le,
    Lt,
}

impl Cmp {
    fn sql(self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Ge => ">=",
            Cmp::Le => "<=",
            Cmp::Lt => "<",
        }
    }
}

/// A single typed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Compare {
        column: Column,
        cmp: Cmp,
        value: Value,
    },
    /// Membership; construct with [`Term::one_of`] so the list is never empty.
    In { column: Column, values: Vec<Value> },
    NotNull(Column),
    /// The listing has an amenity with exactly this name.
    HasAmenity(String),
    /// The listing is available every night in `[from, to)`.
    AvailableNights { from: NaiveDate, to: NaiveDate },
    /// At least `at_least` available calendar days, optionally within `[from, to)`.
    AvailableDays {
        window: Option<(NaiveDate, NaiveDate)>,
        at_least: i64,
    },
}

impl Term {
    pub fn compare(column: Column, cmp: Cmp, value: impl Into<Value>) -> Self {
        Term::Compare {
            column,
            cmp,
            value: value.into(),
        }
    }

    /// Membership over one or many values. Returns `None` for an empty list so
    /// callers omit the term instead of rendering an always-false condition.
    pub fn one_of<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Option<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            None
        } else {
            Some(Term::In { column, values })
        }
    }

    fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Term::Compare { column, cmp, value } => {
                sql.push_str(&format!("{} {} ?", column.sql(), cmp.sql()));
                params.push(value.clone());
            }
            Term::In { column, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                sql.push_str(&format!("{} IN ({placeholders})", column.sql()));
                params.extend(values.iter().cloned());
            }
            Term::NotNull(column) => {
                sql.push_str(&format!("{} IS NOT NULL", column.sql()));
            }
            Term::HasAmenity(name) => {
                sql.push_str(
                    "EXISTS (SELECT 1 FROM amenities AS am WHERE am.id_listing = l.id AND am.name = ?)",
                );
                params.push(Value::Text(name.clone()));
            }
            Term::AvailableNights { from, to } => {
                sql.push_str(
                    "(SELECT COUNT(*) FROM calendar AS c WHERE c.id_listing = l.id \
                     AND c.available = 1 AND c.date >= ? AND c.date < ?) = ?",
                );
                params.push(date_value(*from));
                params.push(date_value(*to));
                params.push(Value::Integer((*to - *from).num_days()));
            }
            Term::AvailableDays { window, at_least } => {
                sql.push_str(
                    "(SELECT COUNT(*) FROM calendar AS c WHERE c.id_listing = l.id AND c.available = 1",
                );
                if let Some((from, to)) = window {
                    sql.push_str(" AND c.date >= ? AND c.date < ?");
                    params.push(date_value(*from));
                    params.push(date_value(*to));
                }
                sql.push_str(") >= ?");
                params.push(Value::Integer(*at_least));
            }
        }
    }
}

pub fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// Accumulates terms; nothing is rendered until [`PredicateBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    terms: Vec<Term>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, term: Term) -> &mut Self {
        self.terms.push(term);
        self
    }

    pub fn push_opt(&mut self, term: Option<Term>) -> &mut Self {
        if let Some(term) = term {
            self.terms.push(term);
        }
        self
    }

    /// Adds the term produced by `f` only when `value` is present.
    pub fn when<T>(&mut self, value: Option<T>, f: impl FnOnce(T) -> Term) -> &mut Self {
        if let Some(v) = value {
            self.terms.push(f(v));
        }
        self
    }

    pub fn build(&self) -> Predicate {
        if self.terms.is_empty() {
            return Predicate::default();
        }

        let mut sql = String::new();
        let mut params = Vec::new();
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            term.render(&mut sql, &mut params);
        }

        Predicate {
            condition: Some(sql),
            params,
        }
    }
}

/// A realized conjunction plus the values for its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    condition: Option<String>,
    params: Vec<Value>,
}

impl Predicate {
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// `WHERE <condition>`, or an empty string when no term was provided.
    pub fn where_clause(&self) -> String {
        self.condition()
            .map(|c| format!("WHERE {c}"))
            .unwrap_or_default()
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// The predicate's values followed by `trailing` (e.g. LIMIT/OFFSET).
    pub fn params_with(&self, trailing: impl IntoIterator<Item = Value>) -> Vec<Value> {
        self.params.iter().cloned().chain(trailing).collect()
    }
}
