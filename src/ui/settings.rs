//! Connection settings overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, SettingsField, SettingsForm};
use crate::ui::common::centered;

pub fn render_overlay(frame: &mut Frame, app: &App, form: &SettingsForm, area: Rect) {
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(Span::styled("Connect to a monitored machine", app.theme.header)),
        Line::from(""),
    ];

    for field in SettingsField::ALL {
        let focused = field == form.field;
        let marker = if focused { "▶ " } else { "  " };
        let cursor = if focused { "_" } else { "" };
        let value_style = if focused { app.theme.selected } else { Style::default() };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<14}", field.label()), dim),
            Span::styled(format!("{}{}", form.value(field), cursor), value_style),
        ]));
    }

    lines.push(Line::from(""));
    match form.error {
        Some(ref error) => lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(app.theme.critical),
        ))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(Span::styled(
        "Tab:next field  Enter:save  Esc:cancel",
        dim,
    )));

    let block = Block::default()
        .title(" Connection Settings ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let overlay = centered(area, 52, 13);
    frame.render_widget(Clear, overlay);
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}
