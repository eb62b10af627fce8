pub mod effects;
pub mod surface;
pub mod theme;
pub mod widgets;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::state::{AppMode, AppState},
    ui::{
        theme::{Theme, theme_for},
        widgets::sky::SkyCanvas,
    },
};

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;
const CARD_WIDTH: u16 = 56;
const CARD_HEIGHT: u16 = 12;
const FORECAST_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, state: &AppState) {
    render_at(frame, state, Utc::now());
}

/// Draws the dashboard as of `now`, which only feeds the local clock.
pub fn render_at(frame: &mut Frame, state: &AppState, now: DateTime<Utc>) {
    let area = frame.area();
    let theme = theme_for(state.effects.theme(), state.color_capability);

    frame.render_widget(
        SkyCanvas {
            frame: &state.frame,
            sky: theme.sky,
            capability: state.color_capability,
        },
        area,
    );

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small. Resize to at least 40x16.")
            .style(Style::default().fg(theme.text).bg(theme.surface))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("skycast"));
        frame.render_widget(warning, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(FORECAST_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let card = centered_box(CARD_WIDTH, CARD_HEIGHT, rows[0]);
    widgets::current::render(frame, card, state, theme, now);

    let forecast_area = centered_box(CARD_WIDTH * 2, FORECAST_HEIGHT, rows[1]);
    let days = state
        .weather
        .as_ref()
        .map_or(&[][..], |payload| payload.forecast.as_slice());
    widgets::forecast::render(frame, forecast_area, days, theme);

    render_help_line(frame, rows[2], theme);

    if state.mode == AppMode::Error {
        render_error_popup(frame, area, state, theme);
    }
}

fn render_help_line(frame: &mut Frame, area: Rect, theme: Theme) {
    let key = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(theme.muted_text);
    let line = Line::from(vec![
        Span::styled(" q", key),
        Span::styled(" quit  ", label),
        Span::styled("r", key),
        Span::styled(" refresh  ", label),
        Span::styled("1-6", key),
        Span::styled(" scenarios  ", label),
        Span::styled("g", key),
        Span::styled(" gentle drizzle  ", label),
        Span::styled("f", key),
        Span::styled(" flash", label),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background)),
        area,
    );
}

fn render_error_popup(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let popup = centered_box(50, 7, area);
    frame.render_widget(Clear, popup);
    let panel_style = Style::default().fg(theme.text).bg(theme.popup_surface);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .style(panel_style)
        .border_style(Style::default().fg(theme.danger).bg(theme.popup_surface));
    let message = state
        .last_error
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());
    let text = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(theme.danger))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(theme.muted_text),
        )),
    ])
    .style(panel_style)
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(text, popup);
}

fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
