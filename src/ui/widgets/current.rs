#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::AppState,
    domain::weather::{CurrentWeather, SolarTime, format_clock, round_temp, wind_kmh},
    ui::theme::{Theme, temp_color},
};

const METRIC_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme, now: DateTime<Utc>) {
    let panel_style = Style::default().fg(theme.text).bg(theme.surface);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" SkyCast ")
        .style(panel_style)
        .border_style(Style::default().fg(theme.border).bg(theme.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match &state.current {
        Some(current) => card_lines(state, current, theme, now),
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                state.loading_message.clone(),
                Style::default().fg(theme.muted_text),
            )),
        ],
    };
    frame.render_widget(Paragraph::new(lines).style(panel_style), inner);
}

fn card_lines(
    state: &AppState,
    current: &CurrentWeather,
    theme: Theme,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let offset = current.timezone;
    let muted = Style::default().fg(theme.muted_text);
    let value = Style::default().fg(theme.text);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                current.display_location(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {} local", format_clock(now, offset)), muted),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}°C", round_temp(current.temperature)),
                Style::default()
                    .fg(temp_color(&theme, current.temperature))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(capitalize(&current.weather.description), value),
        ]),
        Line::from(""),
        metric_row(
            ("Feels like", format!("{}°C", round_temp(current.feels_like))),
            ("Humidity", format!("{}%", current.humidity.round() as i32)),
            theme,
        ),
        metric_row(
            ("Wind", format!("{} km/h", wind_kmh(current.wind_speed))),
            ("Pressure", format!("{} hPa", current.pressure.round() as i32)),
            theme,
        ),
        metric_row(
            ("Visibility", format!("{:.1} km", current.visibility)),
            ("Clouds", format!("{}%", current.cloudiness.round() as i32)),
            theme,
        ),
        metric_row(
            ("Sunrise", solar_clock(&current.sunrise, offset)),
            ("Sunset", solar_clock(&current.sunset, offset)),
            theme,
        ),
        Line::from(""),
    ];

    let mut footer = vec![Span::styled(
        match state.last_updated {
            Some(at) => format!("Updated {}", format_clock(at, offset)),
            None => "Not updated yet".to_string(),
        },
        muted,
    )];
    if let Some(scenario) = state.scenario {
        footer.push(Span::styled("  scenario: ", muted));
        footer.push(Span::styled(
            scenario.label().to_string(),
            Style::default().fg(theme.accent),
        ));
    }
    lines.push(Line::from(footer));
    lines
}

fn metric_row(left: (&str, String), right: (&str, String), theme: Theme) -> Line<'static> {
    let muted = Style::default().fg(theme.muted_text);
    let value = Style::default().fg(theme.text);
    let left_text = format!("{} {}", left.0, left.1);
    let pad = METRIC_WIDTH.saturating_sub(left_text.chars().count()).max(1);
    Line::from(vec![
        Span::styled(format!("{} ", left.0), muted),
        Span::styled(left.1, value),
        Span::raw(" ".repeat(pad)),
        Span::styled(format!("{} ", right.0), muted),
        Span::styled(right.1, value),
    ])
}

fn solar_clock(time: &SolarTime, offset: i32) -> String {
    time.to_instant()
        .map_or_else(|| "--:--".to_string(), |at| format_clock(at, offset))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_provider_descriptions() {
        assert_eq!(capitalize("céu limpo"), "Céu limpo");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn unparsable_solar_times_render_as_dashes() {
        assert_eq!(solar_clock(&SolarTime::Text("soon".to_string()), 0), "--:--");
        assert_eq!(solar_clock(&SolarTime::Epoch(6 * 3600), -10_800), "03:00");
    }
}
