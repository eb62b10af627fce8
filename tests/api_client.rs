mod common;

use common::{location_envelope, mount_json, weather_envelope};
use serde_json::json;
use skycast::{
    data::{
        api::{ApiClient, FetchError},
        cache::ApiCache,
        location::{LocationRequest, resolve},
    },
    domain::weather::{Coordinates, SolarTime, WeatherCategory},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

#[tokio::test]
async fn weather_payload_is_unwrapped_from_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("lat", "-23.5505"))
        .and(query_param("lon", "-46.6333"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(weather_envelope("Drizzle", "light drizzle")),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let payload = client
        .weather(Some(Coordinates::new(-23.5505, -46.6333)))
        .await
        .expect("weather");

    assert_eq!(payload.current.category(), WeatherCategory::Drizzle);
    assert_eq!(payload.current.sunrise, SolarTime::Epoch(0));
    assert_eq!(payload.forecast.len(), 6);
    assert_eq!(payload.location, Some(Coordinates::new(-23.5505, -46.6333)));
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_api_error() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/location/search",
        404,
        json!({"success": false, "error": "Local não encontrado"}),
    )
    .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let err = client.search_location("Atlantis").await.expect_err("not found");
    assert!(matches!(&err, FetchError::Api(message) if message == "Local não encontrado"));
}

#[tokio::test]
async fn non_json_failure_reports_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let err = client.ip_location().await.expect_err("bad gateway");
    assert!(matches!(err, FetchError::Status(502)));
}

#[tokio::test]
async fn cached_response_covers_a_later_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_envelope("Snow", "snow")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let fresh = client.weather(None).await.expect("fresh");
    let cached = client.weather(None).await.expect("cached fallback");
    assert_eq!(fresh, cached);

    let other = client.weather(Some(Coordinates::new(1.0, 2.0))).await;
    assert!(matches!(other, Err(FetchError::Status(500))));
}

#[tokio::test]
async fn malformed_success_does_not_replace_the_cached_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_envelope("Rain", "light rain")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/api/weather",
        200,
        json!({"success": true, "data": {"current": {}}}),
    )
    .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let fresh = client.weather(None).await.expect("fresh");
    let after_bad_body = client.weather(None).await.expect("cached instead of malformed");
    assert_eq!(after_bad_body, fresh);

    drop(server);
    let offline = client.weather(None).await.expect("cached while offline");
    assert_eq!(offline.current.category(), WeatherCategory::Rain);
    assert_eq!(offline, fresh);
}

#[tokio::test]
async fn malformed_success_without_cache_is_a_shape_error() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/weather",
        200,
        json!({"success": true, "data": {"current": {}}}),
    )
    .await;

    let client = ApiClient::new(server.uri()).expect("client");
    let err = client.weather(None).await.expect_err("malformed");
    assert!(matches!(err, FetchError::Shape(_)));
}

#[tokio::test]
async fn persisted_cache_serves_a_new_client_when_offline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = MockServer::start().await;
    mount_json(&server, "/api/location", 200, location_envelope(-30.03, -51.23, "Porto Alegre")).await;

    let online = ApiClient::with_cache(server.uri(), ApiCache::open(dir.path()).expect("cache"))
        .expect("client");
    online.ip_location().await.expect("online");
    let uri = server.uri();
    drop(server);

    let offline = ApiClient::with_cache(uri, ApiCache::open(dir.path()).expect("reopen"))
        .expect("client");
    let info = offline.ip_location().await.expect("served from disk");
    assert_eq!(info.city.as_deref(), Some("Porto Alegre"));
}

#[tokio::test]
async fn resolve_prefers_search_and_falls_back_to_ip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/location/search"))
        .and(query_param("q", "Recife"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_envelope(-8.05, -34.9, "Recife")))
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/api/location/search",
        404,
        json!({"success": false, "error": "Local não encontrado"}),
    )
    .await;
    mount_json(&server, "/api/location", 200, location_envelope(-23.55, -46.63, "São Paulo")).await;

    let client = ApiClient::new(server.uri()).expect("client");
    let found = resolve(&client, &LocationRequest::Search("Recife".to_string())).await;
    assert_eq!(found, Some(Coordinates::new(-8.05, -34.9)));

    let fallback = resolve(&client, &LocationRequest::Search("Atlantis".to_string())).await;
    assert_eq!(fallback, Some(Coordinates::new(-23.55, -46.63)));

    let auto = resolve(&client, &LocationRequest::Auto).await;
    assert_eq!(auto, Some(Coordinates::new(-23.55, -46.63)));
}

#[tokio::test]
async fn resolve_gives_up_quietly_when_everything_fails() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/location", 500, json!({"success": false, "error": "down"})).await;

    let client = ApiClient::new(server.uri()).expect("client");
    assert_eq!(resolve(&client, &LocationRequest::Auto).await, None);
    assert_eq!(
        resolve(&client, &LocationRequest::Coordinates(Coordinates::new(5.0, 6.0))).await,
        Some(Coordinates::new(5.0, 6.0))
    );
}
