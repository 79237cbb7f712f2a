use std::collections::BTreeSet;

use crate::errors::ServerError;
use crate::tests::utils::{get, get_err, get_json, ids, json_body, FixtureDb};

fn approx(value: &serde_json::Value, expected: f64) {
    let got = value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"));
    assert!((got - expected).abs() < 1e-9, "{got} != {expected}");
}

#[test]
fn profile_aggregates_owned_listings() {
    let fixture = FixtureDb::seeded();
    let body = get_json(fixture.database(), "/api/hosts/1/profile");

    assert_eq!(body["host_name"], "Ana");
    assert_eq!(body["host_url"], "https://example.com/users/1");
    assert_eq!(body["host_location"], "Rio de Janeiro");
    assert_eq!(body["total_properties"], 4);
    // (4.8 + 4.9 + 4.0) / 3, the unrated listing is left out
    approx(&body["average_rating"], 4.57);
    assert_eq!(body["total_reviews"], 160);
}

#[test]
fn host_without_listings_has_empty_aggregates() {
    let fixture = FixtureDb::seeded();
    let body = get_json(fixture.database(), "/api/hosts/4/profile");

    assert_eq!(body["total_properties"], 0);
    assert!(body["average_rating"].is_null());
    assert_eq!(body["total_reviews"], 0);
}

#[test]
fn unknown_host_is_not_found() {
    let fixture = FixtureDb::seeded();
    let db = fixture.database();

    assert_eq!(get(db, "/api/hosts/99/profile").status(), 404);
    assert_eq!(get(db, "/api/hosts/99/properties").status(), 404);
    assert!(matches!(
        get_err(db, "/api/hosts/99/rank?neighborhood=Centro"),
        ServerError::NotFound(_)
    ));
    match get_err(db, "/api/hosts/x/profile") {
        ServerError::InvalidFilter { field, .. } => assert_eq!(field, "host_id"),
        other => panic!("expected InvalidFilter, got: {:?}", other),
    }
}

#[test]
fn host_properties_are_ranked_among_themselves() {
    let fixture = FixtureDb::seeded();
    let db = fixture.database();

    let body = get_json(db, "/api/hosts/1/properties");
    assert_eq!(ids(&body, "property_id"), vec![4, 1, 7, 5]);
    assert_eq!(ids(&body, "ranking_among_host_properties"), vec![1, 2, 3, 4]);

    assert_eq!(get_json(db, "/api/hosts/4/properties"), serde_json::json!([]));
}

#[test]
fn host_properties_pages_cover_everything_once() {
    let fixture = FixtureDb::with(|conn| {
        use crate::tests::utils::{host, listing};
        host(conn, 1, "Ana", false, false);
        for id in 1..=12 {
            // Several exact ties so the id tiebreak matters.
            let rating = 3.0 + (id % 4) as f64 * 0.5;
            listing(conn, id, 1, "Centro", Some(100.0), Some(rating), Some(10));
        }
    });
    let db = fixture.database();

    let mut seen = Vec::new();
    for offset in [0, 5, 10] {
        let page = ids(
            &get_json(db, &format!("/api/hosts/1/properties?offset={offset}")),
            "property_id",
        );
        assert!(page.len() <= 5);
        seen.extend(page);
    }

    let unique: BTreeSet<i64> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 12);
    assert_eq!(unique, (1..=12).collect());

    let past_end = get_json(db, "/api/hosts/1/properties?offset=15");
    assert!(past_end.as_array().unwrap().is_empty());
}

#[test]
fn ranking_table_only_has_hosts_with_two_listings() {
    let fixture = FixtureDb::seeded();
    let body = get_json(fixture.database(), "/api/hosts/ranking");

    // (Ana, Sul) 4.9 | (Bruno, Centro) 4.7 | (Ana, Centro) 4.4
    let rows: Vec<(i64, String, i64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["host_id"].as_i64().unwrap(),
                r["neighborhood"].as_str().unwrap().to_string(),
                r["neighborhood_host_rank"].as_i64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            (1, "Sul".to_string(), 1),
            (2, "Centro".to_string(), 1),
            (1, "Centro".to_string(), 2),
        ]
    );

    approx(&body[1]["avg_rating"], 4.7);
    approx(&body[1]["avg_price"], 150.0);
    assert_eq!(body[1]["total_properties"], 2);
    assert_eq!(body[1]["total_reviews"], 120);
}

#[test]
fn ranking_table_filters_by_neighborhood() {
    let fixture = FixtureDb::seeded();
    let body = get_json(fixture.database(), "/api/hosts/ranking?neighborhood=Centro");

    assert_eq!(ids(&body, "host_id"), vec![2, 1]);
    assert_eq!(ids(&body, "neighborhood_host_rank"), vec![1, 2]);
}

#[test]
fn single_host_rank_lookup() {
    let fixture = FixtureDb::seeded();
    let db = fixture.database();

    let body = get_json(db, "/api/hosts/1/rank?neighborhood=Centro");
    assert_eq!(
        body,
        serde_json::json!({"host_id": 1, "neighborhood": "Centro", "neighborhood_host_rank": 2})
    );

    let body = get_json(db, "/api/hosts/1/rank?neighborhood=Sul");
    assert_eq!(body["neighborhood_host_rank"], 1);
}

#[test]
fn host_below_threshold_is_not_rankable() {
    let fixture = FixtureDb::seeded();
    let db = fixture.database();

    // Carla has a single listing in Centro, Diego has none.
    for uri in [
        "/api/hosts/3/rank?neighborhood=Centro",
        "/api/hosts/4/rank?neighborhood=Centro",
    ] {
        assert!(
            matches!(get_err(db, uri), ServerError::NotRankable { .. }),
            "{uri}"
        );
    }

    let resp = get(db, "/api/hosts/3/rank?neighborhood=Centro");
    assert_eq!(resp.status(), 404);
    assert_eq!(json_body(resp)["error"], "not_rankable");
}

#[test]
fn rank_lookup_requires_a_neighborhood() {
    let fixture = FixtureDb::seeded();
    match get_err(fixture.database(), "/api/hosts/1/rank") {
        ServerError::InvalidFilter { field, .. } => assert_eq!(field, "neighborhood"),
        other => panic!("expected InvalidFilter, got: {:?}", other),
    }
}

#[test]
fn ranking_table_pages_hold_fifty() {
    let fixture = FixtureDb::with(|conn| {
        use crate::tests::utils::{host, listing};
        for id in 1..=60 {
            host(conn, id, &format!("Host {id}"), false, false);
            let hood = if id % 2 == 0 { "Centro" } else { "Sul" };
            let rating = 3.0 + (id % 5) as f64 * 0.5;
            listing(conn, 2 * id - 1, id, hood, Some(100.0), Some(rating), Some(10));
            listing(conn, 2 * id, id, hood, Some(100.0), Some(rating), Some(10));
        }
    });
    let db = fixture.database();

    let first = ids(&get_json(db, "/api/hosts/ranking"), "host_id");
    let second = ids(&get_json(db, "/api/hosts/ranking?offset=50"), "host_id");
    let past_end = get_json(db, "/api/hosts/ranking?offset=100");

    assert_eq!(first.len(), 50);
    assert_eq!(second.len(), 10);
    assert!(past_end.as_array().unwrap().is_empty());

    let all: BTreeSet<i64> = first.iter().chain(&second).copied().collect();
    assert_eq!(all, (1..=60).collect());
}
