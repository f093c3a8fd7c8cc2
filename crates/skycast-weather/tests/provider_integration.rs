//! Integration tests for OpenWeatherProvider using wiremock.
//!
//! These tests verify request shape, payload decoding, and error mapping
//! against a mock HTTP server.

use skycast_weather::{ConditionGroup, Coordinate, FetchError, OpenWeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A representative current-conditions payload for Seoul.
fn seoul_payload() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lat": 37.4990106, "lon": 127.0328414},
        "name": "Seoul",
        "sys": {"country": "KR"},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {
            "temp": 290.15,
            "feels_like": 289.15,
            "temp_min": 288.15,
            "temp_max": 292.15,
            "humidity": 81
        },
        "wind": {"speed": 2.1},
        "rain": {"1h": 0.8}
    })
}

#[tokio::test]
async fn test_fetch_current_decodes_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "37.4990106"))
        .and(query_param("lon", "127.0328414"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seoul_payload()))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("test-key", mock_server.uri()).unwrap();
    let snapshot = provider
        .fetch_current(Coordinate::new(37.4990106, 127.0328414))
        .await
        .unwrap();

    assert_eq!(snapshot.location_name.as_deref(), Some("Seoul"));
    assert_eq!(snapshot.country.as_deref(), Some("KR"));
    assert_eq!(snapshot.condition, ConditionGroup::Rain);
    assert_eq!(snapshot.condition_detail.as_deref(), Some("light rain"));
    assert!((snapshot.temperature.current - 17.0).abs() < 1e-9);
    assert_eq!(snapshot.humidity, Some(81));
    assert_eq!(snapshot.rain_1h, Some(0.8));
    assert!((snapshot.coord.lat - 37.4990106).abs() < 1e-9);
}

#[tokio::test]
async fn test_server_error_maps_to_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("test-key", mock_server.uri()).unwrap();
    let err = provider
        .fetch_current(Coordinate::new(37.5, 127.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_unauthorized_maps_to_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("bad-key", mock_server.uri()).unwrap();
    let err = provider
        .fetch_current(Coordinate::new(37.5, 127.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_payload_without_coord_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Nowhere",
            "main": {"temp": 290.15}
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("test-key", mock_server.uri()).unwrap();
    let err = provider
        .fetch_current(Coordinate::new(37.5, 127.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UpstreamMalformed(_)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_base_url("test-key", mock_server.uri()).unwrap();
    let err = provider
        .fetch_current(Coordinate::new(37.5, 127.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UpstreamMalformed(_)));
}
