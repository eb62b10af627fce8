mod common;

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use common::{cli_for, payload};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, style::Color};
use skycast::{
    app::{
        events::AppEvent,
        state::{AppMode, AppState},
    },
    ui::{self, theme::ColorCapability},
};
use tokio::sync::mpsc;

fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

fn draw(state: &AppState, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    let now = Utc.with_ymd_and_hms(2025, 10, 14, 15, 30, 0).unwrap();
    terminal
        .draw(|frame| ui::render_at(frame, state, now))
        .expect("draw");
    terminal.backend().buffer().clone()
}

async fn ready_state(main: &str, description: &str, extra: &[&str]) -> AppState {
    let cli = cli_for("http://127.0.0.1:9", extra);
    let mut app = AppState::new(&cli).expect("state");
    app.color_capability = ColorCapability::TrueColor;
    app.resize_viewport(100, 32);
    let (tx, _rx) = mpsc::channel(16);
    app.handle_event(
        AppEvent::FetchSucceeded(Box::new(payload(main, description))),
        &tx,
        &cli,
    )
    .await
    .expect("payload");
    app
}

#[tokio::test]
async fn dashboard_shows_card_forecast_and_help() {
    let app = ready_state("Rain", "moderate rain", &["--no-animation"]).await;
    let text = buffer_lines(&draw(&app, 100, 32)).join("\n");

    assert!(text.contains("São Paulo, BR"), "{text}");
    assert!(text.contains("15:30 local"));
    assert!(text.contains("25°C"));
    assert!(text.contains("Moderate rain"));
    assert!(text.contains("Wind 13 km/h"));
    assert!(text.contains("Pressure 1014 hPa"));
    assert!(text.contains("Visibility 10.0 km"));
    assert!(text.contains("Sunrise 00:00"));
    assert!(text.contains("Sunset 23:59"));
    for day in ["Wed", "Thu", "Fri", "Sat", "Sun"] {
        assert!(text.contains(day), "missing {day}");
    }
    assert!(!text.contains("Mon"), "only five days are shown");
    assert!(text.contains("1-6 scenarios"));
}

#[tokio::test]
async fn sky_background_follows_the_theme() {
    let app = ready_state("Clear", "clear sky", &["--no-animation"]).await;
    let buffer = draw(&app, 100, 32);
    assert_eq!(buffer[(0, 0)].bg, Color::Rgb(38, 112, 181));

    let stormy = ready_state("Thunderstorm", "thunderstorm", &["--no-animation"]).await;
    let buffer = draw(&stormy, 100, 32);
    assert_eq!(buffer[(0, 0)].bg, Color::Rgb(40, 38, 70));
}

#[tokio::test]
async fn animated_rain_leaves_braille_ink_on_the_sky() {
    let mut app = ready_state("Rain", "heavy rain", &[]).await;
    let (tx, _rx) = mpsc::channel(16);
    let cli = cli_for("http://127.0.0.1:9", &[]);
    for _ in 0..30 {
        app.last_frame_at = Instant::now() - Duration::from_millis(50);
        app.handle_event(AppEvent::TickFrame, &tx, &cli)
            .await
            .expect("frame");
    }
    let buffer = draw(&app, 100, 32);
    let braille = buffer
        .content()
        .iter()
        .filter(|cell| {
            cell.symbol()
                .chars()
                .next()
                .is_some_and(|ch| ('\u{2801}'..='\u{28ff}').contains(&ch))
        })
        .count();
    assert!(braille > 0);
}

#[tokio::test]
async fn error_popup_overlays_the_dashboard() {
    let mut app = ready_state("Clear", "clear sky", &["--no-animation"]).await;
    app.mode = AppMode::Error;
    app.last_error = Some("server answered with status 503".to_string());
    let text = buffer_lines(&draw(&app, 100, 32)).join("\n");
    assert!(text.contains("Error"));
    assert!(text.contains("server answered with status 503"));
    assert!(text.contains("Press any key to close"));
}

#[tokio::test]
async fn tiny_terminal_gets_a_resize_hint() {
    let app = ready_state("Clear", "clear sky", &["--no-animation"]).await;
    let text = buffer_lines(&draw(&app, 30, 10)).join("\n");
    assert!(text.contains("Terminal too"));
}

#[tokio::test]
async fn loading_state_shows_the_status_message() {
    let cli = cli_for("http://127.0.0.1:9", &[]);
    let mut app = AppState::new(&cli).expect("state");
    app.loading_message = "Detecting location...".to_string();
    let text = buffer_lines(&draw(&app, 100, 32)).join("\n");
    assert!(text.contains("Detecting location..."));
    assert!(text.contains("No forecast data"));
}
