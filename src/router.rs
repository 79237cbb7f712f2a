use astra::Request;
use chrono::Local;
use serde_json::json;

use crate::db::{heatmap, hosts, listings, reviews, stats, Database};
use crate::errors::ServerError;
use crate::query::filters::review_year;
use crate::query::{DealFilters, Page, PageKind, QueryParams, SearchFilters};
use crate::responses::{json_response, no_content, ResultResp};

pub fn handle(req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str();
    let q = QueryParams::parse(req.uri().query());
    let segments: Vec<&str> = req
        .uri()
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (method, segments.as_slice()) {
        ("OPTIONS", _) => no_content(),

        ("GET", []) => json_response(&json!({
            "message": "Listing insights API",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "running",
        })),
        ("GET", ["health"]) => {
            db.ping()?;
            json_response(&json!({ "status": "healthy", "database": "connected" }))
        }

        // Listings
        ("GET", ["api", "listings", "search"]) => {
            let filters = SearchFilters::from_params(&q)?;
            let page = Page::from_params(PageKind::Search, &q)?;
            json_response(&listings::search_listings(db, &filters, page)?)
        }
        ("GET", ["api", "listings", "best-deals"]) => {
            let filters = DealFilters::from_params(&q)?;
            let page = Page::from_params(PageKind::BestDeals, &q)?;
            json_response(&listings::best_deals(db, &filters, page)?)
        }

        // Properties
        ("GET", ["api", "properties", "trending"]) => {
            let today = Local::now().date_naive();
            json_response(&stats::trending_listings(db, today)?)
        }
        ("GET", ["api", "properties", id]) => {
            let id = entity_id("property_id", id)?;
            json_response(&listings::get_listing_detail(db, id)?)
        }
        ("GET", ["api", "properties", id, "rank"]) => {
            let id = entity_id("property_id", id)?;
            json_response(&listings::get_listing_rank(db, id)?)
        }
        ("GET", ["api", "properties", id, "amenities"]) => {
            let id = entity_id("property_id", id)?;
            json_response(&listings::get_amenities(db, id)?)
        }
        ("GET", ["api", "properties", id, "availability"]) => {
            let id = entity_id("property_id", id)?;
            json_response(&listings::get_availability(db, id)?)
        }
        ("GET", ["api", "properties", id, "reviews"]) => {
            let id = entity_id("property_id", id)?;
            let min_year = review_year(&q)?;
            let page = Page::from_params(PageKind::Reviews, &q)?;
            json_response(&reviews::get_property_reviews(db, id, min_year, page)?)
        }

        // Hosts
        ("GET", ["api", "hosts", "ranking"]) => {
            let page = Page::from_params(PageKind::HostRanking, &q)?;
            json_response(&hosts::host_ranking(db, q.get("neighborhood"), page)?)
        }
        ("GET", ["api", "hosts", id, "profile"]) => {
            let id = entity_id("host_id", id)?;
            json_response(&hosts::get_host_profile(db, id)?)
        }
        ("GET", ["api", "hosts", id, "properties"]) => {
            let id = entity_id("host_id", id)?;
            let page = Page::from_params(PageKind::HostListings, &q)?;
            json_response(&hosts::get_host_properties(db, id, page)?)
        }
        ("GET", ["api", "hosts", id, "rank"]) => {
            let id = entity_id("host_id", id)?;
            let neighborhood = q
                .get("neighborhood")
                .ok_or_else(|| ServerError::invalid_filter("neighborhood", "is required"))?;
            json_response(&hosts::neighborhood_host_rank(db, id, neighborhood)?)
        }

        // Aggregates
        ("GET", ["api", "neighborhoods", "stats"]) => {
            json_response(&stats::neighborhood_stats(db)?)
        }
        ("GET", ["api", "stats", "overview"]) => json_response(&stats::overview(db)?),
        ("GET", ["api", "heatmap", "density"]) => {
            let filters = SearchFilters::from_params(&q)?;
            json_response(&heatmap::density(db, &filters)?)
        }
        ("GET", ["api", "heatmap", "price"]) => {
            let filters = SearchFilters::from_params(&q)?;
            json_response(&heatmap::price(db, &filters)?)
        }

        _ => Err(ServerError::RouteNotFound),
    }
}

/// Path identifiers are positive integers.
fn entity_id(field: &'static str, raw: &str) -> Result<i64, ServerError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServerError::invalid_filter(
            field,
            format!("expected a positive integer, got {raw:?}"),
        )),
    }
}
