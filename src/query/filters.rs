// src/query/filters.rs
use chrono::NaiveDate;

use crate::errors::ServerError;
use crate::query::params::QueryParams;
use crate::query::predicate::{Cmp, Column, Predicate, PredicateBuilder, Term};

/// Optional rectangle; each side may be given on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoBounds {
    pub south: Option<f64>,
    pub north: Option<f64>,
    pub west: Option<f64>,
    pub east: Option<f64>,
}

impl GeoBounds {
    pub fn is_empty(&self) -> bool {
        self.south.is_none() && self.north.is_none() && self.west.is_none() && self.east.is_none()
    }
}

/// Listing filters shared by search and the heatmaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub neighborhoods: Vec<String>,
    pub property_type: Option<String>,
    pub room_type: Option<String>,
    pub min_rating: Option<f64>,
    pub min_capacity: Option<i64>,
    pub min_reviews: Option<i64>,
    pub amenity: Option<String>,
    pub superhost_only: Option<bool>,
    pub bounds: GeoBounds,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub min_available_days: Option<i64>,
}

impl SearchFilters {
    /// Parse and validate filters from the query string.
    pub fn from_params(q: &QueryParams) -> Result<Self, ServerError> {
        // `neighborhoods=A,B` and repeated `neighborhood=A&neighborhood=B` both work.
        let neighborhoods = q
            .all("neighborhoods")
            .chain(q.all("neighborhood"))
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect();

        let filters = Self {
            min_price: q.parse_opt("min_price", "a number")?,
            max_price: q.parse_opt("max_price", "a number")?,
            neighborhoods,
            property_type: q.text("property_type"),
            room_type: q.text("room_type"),
            min_rating: q.parse_opt("min_rating", "a number")?,
            min_capacity: q.parse_opt("min_capacity", "an integer")?,
            min_reviews: q.parse_opt("min_reviews", "an integer")?,
            amenity: q.text("amenity"),
            superhost_only: q.bool_opt("superhost_only")?,
            bounds: GeoBounds {
                south: q.parse_opt("south", "a latitude")?,
                north: q.parse_opt("north", "a latitude")?,
                west: q.parse_opt("west", "a longitude")?,
                east: q.parse_opt("east", "a longitude")?,
            },
            check_in: q.date_opt("check_in")?,
            check_out: q.date_opt("check_out")?,
            min_available_days: q.parse_opt("min_available_days", "an integer")?,
        };

        filters.validate()?;
        Ok(filters)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        non_negative_f64("min_price", self.min_price)?;
        non_negative_f64("max_price", self.max_price)?;
        if let (Some(lo), Some(hi)) = (self.min_price, self.max_price) {
            if lo > hi {
                return Err(ServerError::invalid_filter(
                    "max_price",
                    format!("must be >= min_price ({lo})"),
                ));
            }
        }

        if let Some(r) = self.min_rating {
            if !(0.0..=5.0).contains(&r) {
                return Err(ServerError::invalid_filter(
                    "min_rating",
                    format!("must be between 0 and 5, got {r}"),
                ));
            }
        }

        non_negative_i64("min_capacity", self.min_capacity)?;
        non_negative_i64("min_reviews", self.min_reviews)?;
        non_negative_i64("min_available_days", self.min_available_days)?;

        non_blank("property_type", self.property_type.as_deref())?;
        non_blank("room_type", self.room_type.as_deref())?;
        non_blank("amenity", self.amenity.as_deref())?;

        let b = &self.bounds;
        within("south", b.south, 90.0)?;
        within("north", b.north, 90.0)?;
        within("west", b.west, 180.0)?;
        within("east", b.east, 180.0)?;
        if let (Some(s), Some(n)) = (b.south, b.north) {
            if s > n {
                return Err(ServerError::invalid_filter("north", "must be >= south"));
            }
        }
        if let (Some(w), Some(e)) = (b.west, b.east) {
            if w > e {
                return Err(ServerError::invalid_filter("east", "must be >= west"));
            }
        }

        match (self.check_in, self.check_out) {
            (Some(_), None) => {
                return Err(ServerError::invalid_filter(
                    "check_out",
                    "required when check_in is given",
                ))
            }
            (None, Some(_)) => {
                return Err(ServerError::invalid_filter(
                    "check_in",
                    "required when check_out is given",
                ))
            }
            (Some(i), Some(o)) if o <= i => {
                return Err(ServerError::invalid_filter(
                    "check_out",
                    "must be after check_in",
                ))
            }
            _ => {}
        }

        Ok(())
    }

    fn stay(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.check_in.zip(self.check_out)
    }

    /// Push one term per provided filter. Assumes [`SearchFilters::validate`] passed.
    pub fn apply(&self, builder: &mut PredicateBuilder) {
        builder
            .when(self.min_price, |v| Term::compare(Column::Price, Cmp::Ge, v))
            .when(self.max_price, |v| Term::compare(Column::Price, Cmp::Le, v))
            .push_opt(Term::one_of(Column::Neighborhood, self.neighborhoods.iter().cloned()))
            .when(self.property_type.clone(), |v| {
                Term::compare(Column::PropertyType, Cmp::Eq, v)
            })
            .when(self.room_type.clone(), |v| Term::compare(Column::RoomType, Cmp::Eq, v))
            .when(self.min_rating, |v| Term::compare(Column::Rating, Cmp::Ge, v))
            .when(self.min_capacity, |v| Term::compare(Column::Capacity, Cmp::Ge, v))
            .when(self.min_reviews, |v| Term::compare(Column::ReviewCount, Cmp::Ge, v))
            .when(self.amenity.clone(), Term::HasAmenity)
            .when(self.superhost_only.filter(|only| *only), |_| {
                Term::compare(Column::HostSuperhost, Cmp::Eq, 1_i64)
            });

        let b = self.bounds;
        if !b.is_empty() {
            builder
                .push(Term::NotNull(Column::Latitude))
                .push(Term::NotNull(Column::Longitude));
        }
        builder
            .when(b.south, |v| Term::compare(Column::Latitude, Cmp::Ge, v))
            .when(b.north, |v| Term::compare(Column::Latitude, Cmp::Le, v))
            .when(b.west, |v| Term::compare(Column::Longitude, Cmp::Ge, v))
            .when(b.east, |v| Term::compare(Column::Longitude, Cmp::Le, v))
            .when(self.stay(), |(from, to)| Term::AvailableNights { from, to });

        let window = self.stay();
        builder.when(self.min_available_days, |at_least| Term::AvailableDays {
            window,
            at_least,
        });
    }

    /// Validate, then realize `base` terms followed by the provided filters.
    pub fn predicate(&self, base: impl IntoIterator<Item = Term>) -> Result<Predicate, ServerError> {
        self.validate()?;

        let mut builder = PredicateBuilder::new();
        for term in base {
            builder.push(term);
        }
        self.apply(&mut builder);
        Ok(builder.build())
    }
}

/// Thresholds for the best-deals view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealFilters {
    /// Exclusive upper bound on price.
    pub max_price: f64,
    pub min_amenities: i64,
}

impl Default for DealFilters {
    fn default() -> Self {
        Self {
            max_price: 5000.0,
            min_amenities: 3,
        }
    }
}

impl DealFilters {
    pub fn from_params(q: &QueryParams) -> Result<Self, ServerError> {
        let defaults = Self::default();
        let filters = Self {
            max_price: q.parse_opt("max_price", "a number")?.unwrap_or(defaults.max_price),
            min_amenities: q
                .parse_opt("min_amenities", "an integer")?
                .unwrap_or(defaults.min_amenities),
        };
        filters.validate()?;
        Ok(filters)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        non_negative_f64("max_price", Some(self.max_price))?;
        non_negative_i64("min_amenities", Some(self.min_amenities))
    }

    /// Verified hosts and price strictly under the cap. The amenity count is a
    /// grouped condition and stays with the query.
    pub fn predicate(&self) -> Result<Predicate, ServerError> {
        self.validate()?;
        Ok(PredicateBuilder::new()
            .push(Term::compare(Column::Price, Cmp::Lt, self.max_price))
            .push(Term::compare(Column::HostVerified, Cmp::Eq, 1_i64))
            .build())
    }
}

/// Optional `min_year` for review listings.
pub fn review_year(q: &QueryParams) -> Result<Option<i32>, ServerError> {
    let year: Option<i32> = q.parse_opt("min_year", "a year")?;
    match year {
        Some(y) if !(1..=9999).contains(&y) => Err(ServerError::invalid_filter(
            "min_year",
            format!("must be between 1 and 9999, got {y}"),
        )),
        other => Ok(other),
    }
}

fn non_negative_f64(field: &'static str, value: Option<f64>) -> Result<(), ServerError> {
    match value {
        Some(v) if !v.is_finite() => Err(ServerError::invalid_filter(field, "must be a finite number")),
        Some(v) if v < 0.0 => Err(ServerError::invalid_filter(field, format!("must be >= 0, got {v}"))),
        _ => Ok(()),
    }
}

fn non_negative_i64(field: &'static str, value: Option<i64>) -> Result<(), ServerError> {
    match value {
        Some(v) if v < 0 => Err(ServerError::invalid_filter(field, format!("must be >= 0, got {v}"))),
        _ => Ok(()),
    }
}

fn non_blank(field: &'static str, value: Option<&str>) -> Result<(), ServerError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ServerError::invalid_filter(field, "must not be empty")),
        _ => Ok(()),
    }
}

fn within(field: &'static str, value: Option<f64>, limit: f64) -> Result<(), ServerError> {
    match value {
        Some(v) if !v.is_finite() || v.abs() > limit => Err(ServerError::invalid_filter(
            field,
            format!("must be between -{limit} and {limit}, got {v}"),
        )),
        _ => Ok(()),
    }
}
