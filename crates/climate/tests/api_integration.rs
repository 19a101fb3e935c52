//! End-to-end tests driving the climate router over an in-memory dataset.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Days, NaiveDate};
use climate::api::{climate_routes, ClimateApiState};
use climate::{ClimateService, InMemoryClimateStore, Measurement, Station, TemperatureStats};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const INVALID_DATE_BODY: &str = r#"{"error":"Invalid date format. Please use YYYY-MM-DD"}"#;

/// USC001 reports every day from 2016-01-01 through 2017-08-23 with
/// temperatures below 90; USC002 reports every third day at 90 or above.
fn fixture_measurements() -> Vec<Measurement> {
    let first = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();

    let mut rows = Vec::new();
    let mut day = first;
    let mut i: u64 = 0;
    while day <= last {
        let date = day.format("%Y-%m-%d").to_string();
        let prcp = if i % 5 == 0 { None } else { Some((i % 7) as f64 / 10.0) };
        rows.push(Measurement::new("USC001", date.clone(), prcp, 60.0 + (i % 25) as f64));
        if i % 3 == 0 {
            rows.push(Measurement::new("USC002", date, Some(0.05), 90.0 + (i % 4) as f64));
        }
        day = day + Days::new(1);
        i += 1;
    }
    rows
}

fn fixture_store() -> InMemoryClimateStore {
    InMemoryClimateStore::with_data(
        vec![
            Station::new("USC001").with_name("ALPHA"),
            Station::new("USC002").with_name("BRAVO"),
        ],
        fixture_measurements(),
    )
}

fn router_for(store: &InMemoryClimateStore) -> Router {
    let service = ClimateService::new(Arc::new(store.clone()));
    climate_routes(Arc::new(ClimateApiState::new(service)))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn stats_of(value: &Value) -> (f64, f64, f64) {
    let values = value.as_array().unwrap();
    assert_eq!(values.len(), 3);
    (
        values[0].as_f64().unwrap(),
        values[1].as_f64().unwrap(),
        values[2].as_f64().unwrap(),
    )
}

#[tokio::test]
async fn test_tobs_returns_most_active_station_last_year() {
    let store = fixture_store();
    let router = router_for(&store);

    let (status, body) = get_json(&router, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);

    let observations = body.as_array().unwrap();
    // 2016-08-23 through 2017-08-23 inclusive
    assert_eq!(observations.len(), 366);
    assert_eq!(observations.first().unwrap()["date"], "2016-08-23");
    assert_eq!(observations.last().unwrap()["date"], "2017-08-23");

    for obs in observations {
        let date = obs["date"].as_str().unwrap();
        assert!(("2016-08-23"..="2017-08-23").contains(&date));
        // Only USC001 reports below 90
        assert!(obs["tobs"].as_f64().unwrap() < 90.0);
    }
}

#[tokio::test]
async fn test_precipitation_within_one_calendar_year() {
    let store = fixture_store();
    let router = router_for(&store);

    let (status, body) = get_json(&router, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);

    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 366);
    assert!(map.keys().all(|d| ("2016-08-23"..="2017-08-23").contains(&d.as_str())));
    assert!(map.contains_key("2016-08-23"));
    assert!(!map.contains_key("2016-08-22"));
    // Null precipitation stays null rather than disappearing
    assert!(map.values().any(Value::is_null));
}

#[tokio::test]
async fn test_stations_in_storage_order() {
    let store = fixture_store();
    let router = router_for(&store);

    let (status, body) = get_json(&router, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(["USC001", "USC002"]));
}

#[tokio::test]
async fn test_stations_drop_repeated_ids() {
    let store = InMemoryClimateStore::with_data(
        vec![Station::new("A"), Station::new("B"), Station::new("A")],
        vec![Measurement::new("A", "2017-01-01", None, 60.0)],
    );
    let router = router_for(&store);

    let (status, body) = get(&router, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"["A","B"]"#);
}

#[tokio::test]
async fn test_stats_range_matches_independent_aggregation() {
    let store = fixture_store();
    let router = router_for(&store);

    let expected = TemperatureStats::from_temperatures(
        fixture_measurements()
            .iter()
            .filter(|m| m.date.as_str() >= "2017-01-01" && m.date.as_str() <= "2017-01-10")
            .map(|m| m.tobs),
    );

    let (status, body) = get_json(&router, "/api/v1.0/2017-01-01/2017-01-10").await;
    assert_eq!(status, StatusCode::OK);

    let (min, avg, max) = stats_of(&body);
    assert_eq!(Some(min), expected.min);
    assert_eq!(Some(avg), expected.avg);
    assert_eq!(Some(max), expected.max);
}

#[tokio::test]
async fn test_stats_from_start_runs_to_latest_date() {
    let store = fixture_store();
    let router = router_for(&store);

    let (_, open_ended) = get(&router, "/api/v1.0/2017-08-01").await;
    let (_, explicit) = get(&router, "/api/v1.0/2017-08-01/2017-08-23").await;
    assert_eq!(open_ended, explicit);
}

#[tokio::test]
async fn test_stats_are_ordered() {
    let store = fixture_store();
    let router = router_for(&store);

    for (start, end) in [
        ("2016-01-01", "2016-01-01"),
        ("2016-02-28", "2016-03-01"),
        ("2016-06-15", "2017-06-15"),
        ("2017-08-23", "2017-08-23"),
    ] {
        let (status, body) = get_json(&router, &format!("/api/v1.0/{start}/{end}")).await;
        assert_eq!(status, StatusCode::OK);
        let (min, avg, max) = stats_of(&body);
        assert!(min <= avg && avg <= max, "{start}..{end}: {min} {avg} {max}");
    }
}

#[tokio::test]
async fn test_stats_without_rows_are_null() {
    let store = fixture_store();
    let router = router_for(&store);

    let (status, body) = get(&router, "/api/v1.0/2020-01-01/2020-12-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[null,null,null]");

    let (status, body) = get(&router, "/api/v1.0/2017-08-23/2016-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[null,null,null]");
}

#[tokio::test]
async fn test_malformed_dates_are_bad_requests() {
    let store = fixture_store();
    let router = router_for(&store);

    for uri in [
        "/api/v1.0/2020-13-40",
        "/api/v1.0/not-a-date",
        "/api/v1.0/2017-02-30",
        "/api/v1.0/2020-13-40/2017-01-01",
        "/api/v1.0/2017-01-01/not-a-date",
        "/api/v1.0/+2017-01-01",
        "/api/v1.0/-2017-01-01",
        "/api/v1.0/2017-01-01/+2017-12-31",
    ] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(String::from_utf8(body).unwrap(), INVALID_DATE_BODY, "{uri}");
    }
}

#[tokio::test]
async fn test_repeated_requests_are_byte_identical() {
    let store = fixture_store();
    let router = router_for(&store);

    for uri in [
        "/",
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/2017-01-01/2017-01-10",
    ] {
        let (_, first) = get(&router, uri).await;
        let (_, second) = get(&router, uri).await;
        assert_eq!(first, second, "{uri}");
    }
}

#[tokio::test]
async fn test_index_lists_reference_window() {
    let store = fixture_store();
    let router = router_for(&store);

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.starts_with("Welcome to the Climate App API!<br/>"));
    assert!(html.contains("/api/v1.0/precipitation<br/>"));
    assert!(html.contains("/api/v1.0/2016-08-23<br/>"));
    assert!(html.contains("/api/v1.0/2016-08-23/2017-08-23<br/>"));
}

#[tokio::test]
async fn test_empty_dataset() {
    let store = InMemoryClimateStore::new();
    let router = router_for(&store);

    let (status, body) = get_json(&router, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No measurements available");

    let (status, _) = get(&router, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get_json(&router, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/api/v1.0/&lt;start&gt;/&lt;end&gt;"));
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = fixture_store();
    store.set_unavailable(true);
    let router = router_for(&store);

    let (status, body) = get_json(&router, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Storage error"));

    // Validation still wins over an unavailable store
    let (status, _) = get(&router, "/api/v1.0/not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_every_request_releases_its_session() {
    let store = fixture_store();
    let router = router_for(&store);

    for uri in [
        "/",
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/2017-01-01",
        "/api/v1.0/2017-01-01/2017-01-10",
        "/api/v1.0/not-a-date",
    ] {
        get(&router, uri).await;
        assert_eq!(store.open_sessions(), 0, "{uri}");
    }

    let empty = InMemoryClimateStore::new();
    get(&router_for(&empty), "/api/v1.0/tobs").await;
    assert_eq!(empty.open_sessions(), 0);
}
