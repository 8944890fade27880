// API integration tests that verify HTTP endpoints
// Drives the Axum router with oneshot requests against a mocked weather archive

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{daily_payload, date, ARCHIVE_PATH};
use http_body_util::BodyExt; // For `.collect()`
use mockito::{Matcher, Server, ServerGuard};
use serde_json::Value;
use tower::ServiceExt; // For `oneshot`
use weather_dashboard::api::{create_router, generate_openapi_spec, AppState};
use weather_dashboard::fetcher::WeatherArchiveFetcher;
use weather_dashboard::services::WeatherService;

fn app_for(server: &ServerGuard) -> axum::Router {
    let fetcher = WeatherArchiveFetcher::new(format!("{}{}", server.url(), ARCHIVE_PATH));
    create_router(AppState {
        weather_service: WeatherService::new(fetcher),
    })
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = Server::new_async().await;
    let (status, json) = get_json(app_for(&server), "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_daily_weather_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(daily_payload(date(2023, 1, 1), 25, &[4]).to_string())
        .create_async()
        .await;

    let uri = "/api/v1/weather/daily?latitude=40.7128&longitude=-74.0060\
&start_date=2023-01-01&end_date=2023-01-25&page=3&rows_per_page=10";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"]["start_date"], "2023-01-01");

    let labels = json["chart"]["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 25);
    assert_eq!(json["chart"]["span_gaps"], true);
    let first_series = &json["chart"]["series"][0];
    assert_eq!(first_series["metric"], "temperature_2m_max");
    assert!(first_series["values"][4].is_null());
    assert_eq!(first_series["values"].as_array().unwrap().len(), 25);

    assert_eq!(json["table"]["page"], 3);
    assert_eq!(json["table"]["total_pages"], 3);
    assert_eq!(json["table"]["total_rows"], 25);
    assert_eq!(json["table"]["rows_per_page"], 10);
    assert_eq!(json["table"]["rows"].as_array().unwrap().len(), 5);
    assert_eq!(json["table"]["rows"][0]["date"], "2023-01-21");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_daily_weather_page_is_clamped() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(daily_payload(date(2023, 1, 1), 10, &[]).to_string())
        .create_async()
        .await;

    let uri = "/api/v1/weather/daily?latitude=0&longitude=0\
&start_date=2023-01-01&end_date=2023-01-10&page=99";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["table"]["page"], 1);
    assert_eq!(json["table"]["rows"].as_array().unwrap().len(), 10);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_query_never_reaches_archive() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let uri = "/api/v1/weather/daily?latitude=95&longitude=-74\
&start_date=2023-01-01&end_date=2023-03-01";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["latitude", "range"]);
    assert_eq!(json["fields"][0]["message"], "Latitude must be between -90 and 90");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_fields_are_reported() {
    let server = Server::new_async().await;
    let (status, json) = get_json(app_for(&server), "/api/v1/weather/daily").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["fields"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_rows_per_page() {
    let server = Server::new_async().await;
    let uri = "/api/v1/weather/daily?latitude=0&longitude=0\
&start_date=2023-01-01&end_date=2023-01-10&rows_per_page=15";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("10, 20 or 50"));
}

#[tokio::test]
async fn test_non_numeric_pagination_returns_json_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let base = "/api/v1/weather/daily?latitude=0&longitude=0\
&start_date=2023-01-01&end_date=2023-01-10";
    for (extra, needle) in [
        ("&rows_per_page=abc", "Rows per page"),
        ("&page=-1", "Page"),
        ("&page=abc", "Page"),
    ] {
        let uri = format!("{base}{extra}");
        let response = app_for(&server)
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"), "{uri}: {content_type}");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with(needle), "{uri}: {json}");
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_archive_failure_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let uri = "/api/v1/weather/daily?latitude=0&longitude=0\
&start_date=2023-01-01&end_date=2023-01-10";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["upstream_status"], 500);
    assert!(json["error"].as_str().unwrap().starts_with("Network error"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_archive_payload_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"daily": {}}"#)
        .create_async()
        .await;

    let uri = "/api/v1/weather/daily?latitude=0&longitude=0\
&start_date=2023-01-01&end_date=2023-01-10";
    let (status, json) = get_json(app_for(&server), uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json.get("upstream_status").is_none());
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("No weather data available"));

    mock.assert_async().await;
}

#[test]
fn test_openapi_spec_lists_routes() {
    let spec = serde_json::to_value(generate_openapi_spec()).unwrap();
    assert!(spec["paths"]["/api/v1/health"].is_object());
    assert!(spec["paths"]["/api/v1/weather/daily"]["get"].is_object());
    assert!(spec["components"]["schemas"]["DashboardResponse"].is_object());
}
