#![allow(dead_code)]

use std::time::Duration;

use clap::Parser;
use serde_json::{Value, json};
use skycast::{
    app::{
        events::AppEvent,
        state::AppState,
    },
    cli::Cli,
    domain::weather::WeatherPayload,
};
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub fn cli_for(server_uri: &str, extra: &[&str]) -> Cli {
    let mut argv = vec!["skycast", "--api-url", server_uri];
    argv.extend_from_slice(extra);
    Cli::parse_from(argv)
}

/// Current conditions in São Paulo; sunrise 00:00:00 and sunset 23:59:59 UTC
/// so the report reads as day at any time.
pub fn current_json(main: &str, description: &str) -> Value {
    json!({
        "temperature": 24.6,
        "feels_like": 25.1,
        "humidity": 68,
        "pressure": 1014,
        "visibility": 10.0,
        "wind_speed": 3.5,
        "wind_direction": 140,
        "cloudiness": 40,
        "weather": {"main": main, "description": description, "icon": "10d"},
        "city": "São Paulo",
        "country": "BR",
        "sunrise": 0,
        "sunset": 86_399,
        "timezone": 0
    })
}

pub fn forecast_json() -> Value {
    let days = [
        ("2025-10-15", "Wednesday", 17, 26, "Rain"),
        ("2025-10-16", "Thursday", 16, 24, "Clouds"),
        ("2025-10-17", "Friday", 15, 27, "Clear"),
        ("2025-10-18", "Saturday", 18, 29, "Clear"),
        ("2025-10-19", "Sunday", 19, 31, "Thunderstorm"),
        ("2025-10-20", "Monday", 14, 22, "Rain"),
    ];
    Value::Array(
        days.iter()
            .map(|(date, name, min, max, main)| {
                json!({
                    "date": date,
                    "day_name": name,
                    "temp_min": min,
                    "temp_max": max,
                    "weather": {"main": main, "description": main.to_lowercase(), "icon": "01d"},
                    "humidity": 70,
                    "wind_speed": 2.5
                })
            })
            .collect(),
    )
}

pub fn weather_envelope(main: &str, description: &str) -> Value {
    json!({
        "success": true,
        "data": {
            "current": current_json(main, description),
            "forecast": forecast_json(),
            "location": {"lat": -23.5505, "lon": -46.6333}
        }
    })
}

pub fn payload(main: &str, description: &str) -> WeatherPayload {
    let envelope = weather_envelope(main, description);
    serde_json::from_value(envelope["data"].clone()).expect("fixture payload")
}

pub fn location_envelope(lat: f64, lon: f64, city: &str) -> Value {
    json!({
        "success": true,
        "data": {"lat": lat, "lon": lon, "city": city, "country": "Brazil"}
    })
}

pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Feeds queued events back into the state until a fetch completes.
pub async fn pump_until_fetched(
    app: &mut AppState,
    cli: &Cli,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("fetch did not complete in time")
            .expect("channel closed");
        let done = matches!(
            event,
            AppEvent::FetchSucceeded(_) | AppEvent::FetchFailed(_)
        );
        app.handle_event(event, tx, cli).await.expect("handle event");
        if done {
            return;
        }
    }
}
