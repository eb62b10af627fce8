use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    domain::weather::{ForecastDay, round_temp, wind_kmh},
    ui::theme::{Theme, temp_color},
};

pub const MAX_DAYS: usize = 5;

pub fn render(frame: &mut Frame, area: Rect, days: &[ForecastDay], theme: Theme) {
    let panel_style = Style::default().fg(theme.text).bg(theme.surface);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Forecast ")
        .style(panel_style)
        .border_style(Style::default().fg(theme.border).bg(theme.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let days = &days[..days.len().min(MAX_DAYS)];
    if days.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No forecast data",
                Style::default().fg(theme.muted_text),
            )))
            .style(panel_style),
            inner,
        );
        return;
    }

    let columns = Layout::horizontal(vec![Constraint::Ratio(1, days.len() as u32); days.len()])
        .split(inner);
    for (day, column) in days.iter().zip(columns.iter()) {
        frame.render_widget(
            Paragraph::new(day_lines(day, theme)).style(panel_style),
            *column,
        );
    }
}

fn day_lines(day: &ForecastDay, theme: Theme) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme.muted_text);
    vec![
        Line::from(Span::styled(
            day_label(day),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("{}°", round_temp(day.temp_max)),
                Style::default().fg(temp_color(&theme, day.temp_max)),
            ),
            Span::styled(" / ", muted),
            Span::styled(
                format!("{}°", round_temp(day.temp_min)),
                Style::default().fg(temp_color(&theme, day.temp_min)),
            ),
        ]),
        Line::from(Span::styled(day.weather.main.clone(), muted)),
        Line::from(Span::styled(format!("Hum {}%", day.humidity.round() as i32), muted)),
        Line::from(Span::styled(
            format!("{} km/h", wind_kmh(day.wind_speed)),
            muted,
        )),
    ]
}

/// Short weekday name; the backend's `day_name` wins when present.
fn day_label(day: &ForecastDay) -> String {
    if !day.day_name.trim().is_empty() {
        return day.day_name.chars().take(3).collect();
    }
    NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
        .map_or_else(|_| day.date.clone(), |date| date.format("%a").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::Conditions;

    fn day(date: &str, name: &str) -> ForecastDay {
        ForecastDay {
            date: date.to_string(),
            day_name: name.to_string(),
            temp_min: 12.4,
            temp_max: 23.6,
            weather: Conditions {
                main: "Rain".to_string(),
                description: "light rain".to_string(),
                icon: String::new(),
            },
            humidity: 81.0,
            wind_speed: 4.0,
        }
    }

    #[test]
    fn labels_fall_back_to_the_date() {
        assert_eq!(day_label(&day("2025-10-15", "Wednesday")), "Wed");
        assert_eq!(day_label(&day("2025-10-16", "")), "Thu");
        assert_eq!(day_label(&day("tomorrow", "")), "tomorrow");
    }

    #[test]
    fn day_lines_show_rounded_values() {
        let theme = crate::ui::theme::theme_for(
            crate::domain::weather::ThemeKey::default(),
            crate::ui::theme::ColorCapability::TrueColor,
        );
        let text: Vec<String> = day_lines(&day("2025-10-15", ""), theme)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(text, vec!["Wed", "24° / 12°", "Rain", "Hum 81%", "14 km/h"]);
    }
}
