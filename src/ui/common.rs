//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, the error
//! banner and panels, and the help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::format::format_gb;
use crate::poll::Phase;

const TAB_TITLES: [&str; 4] = ["1:Overview", "2:GPUs", "3:Storage", "4:Services"];

/// Render the header bar: connection state, host and VRAM totals.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let status_style = match dashboard.phase {
        Phase::Updated => Style::default().fg(app.theme.healthy),
        Phase::Errored if dashboard.view.is_some() => Style::default().fg(app.theme.warning),
        Phase::Errored => Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        Phase::Idle | Phase::Fetching | Phase::TornDown => {
            Style::default().add_modifier(Modifier::DIM)
        }
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("RIGWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];

    match app.view() {
        Some(view) => {
            spans.push(Span::styled(
                view.host.hostname.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(
                " │ {} GPU{} │ VRAM {} / {} │ ",
                view.gpus.len(),
                if view.gpus.len() == 1 { "" } else { "s" },
                format_gb(view.used_vram_gib()),
                format_gb(view.total_vram_gib()),
            )));
        }
        None => spans.push(Span::raw("Loading... │ ")),
    }
    spans.push(Span::styled(
        target_label(app),
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// What is being polled: the monitor target, or the payload file when
/// there are no connection settings.
fn target_label(app: &App) -> String {
    if app.connection().is_some() {
        app.dashboard.target.to_string()
    } else {
        app.source_description().to_string()
    }
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = TAB_TITLES.iter().map(|t| Line::from(*t)).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// The view whose tab covers `column` on the tab bar.
///
/// Each tab is its title plus one cell of padding on both sides, followed by
/// a one-cell divider.
pub fn tab_at(column: u16) -> Option<View> {
    let mut start = 0u16;
    for (view, title) in View::ALL.iter().zip(TAB_TITLES) {
        let end = start + title.chars().count() as u16 + 2;
        if column < end {
            return Some(*view);
        }
        start = end + 1;
    }
    None
}

/// One-line warning shown above the content when data is stale.
pub fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref error) = app.dashboard.error else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            " ▲ Showing last good data: ",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ),
        Span::styled(error.clone(), Style::default().fg(app.theme.warning)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Panel shown in place of the views while there is no data.
///
/// With an error this is the blocking "service unreachable" state; without
/// one the first fetch is still pending.
pub fn render_no_data(frame: &mut Frame, app: &App, area: Rect) {
    let target = target_label(app);
    let (title, lines, border) = match app.dashboard.error {
        Some(ref error) => (
            " Service unreachable ",
            vec![
                Line::from(Span::styled(
                    "Could not get telemetry from the monitor",
                    Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Target: {}", target)),
                Line::from(format!("Error:  {}", error)),
                Line::from(""),
                Line::from(Span::styled(
                    "Retrying automatically. Press c to change the connection settings.",
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ],
            app.theme.critical,
        ),
        None => (
            " Waiting ",
            vec![Line::from(format!("Waiting for first update from {}...", target))],
            app.theme.border,
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, time since last update and available controls, or a
/// temporary status message.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Gpus | View::Storage => "↑↓:select Tab:switch c:settings e:export ?:help q:quit",
        View::Overview | View::Services => "Tab:switch c:settings e:export ?:help q:quit",
    };

    let freshness = match app.dashboard.last_updated {
        Some(at) => format!("Updated {:.1}s ago", at.elapsed().as_secs_f64()),
        None => app.dashboard.phase.label().to_string(),
    };

    let status = format!(
        " {} > {} | {} | {}",
        app.source_description(),
        app.current_view.label(),
        freshness,
        controls,
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  1-4         Jump to view"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Select GPU / volume"),
        Line::from(""),
        section(" Settings overlay"),
        Line::from("  Tab/↑↓      Next / previous field"),
        Line::from("  Enter       Save"),
        Line::from("  Esc         Cancel"),
        Line::from(""),
        section(" General"),
        Line::from("  c           Connection settings"),
        Line::from("  r           Refresh now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let help_area = centered(area, 42, 22);
    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}
