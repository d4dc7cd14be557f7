//! Terminal rendering.
//!
//! Views only read [`App`](crate::app::App) state; nothing here touches the
//! raw payload or the polling controller.

pub mod common;
pub mod gpus;
pub mod overview;
pub mod services;
pub mod settings;
pub mod storage;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Draw one full frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5u16.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let banner = if app.dashboard.is_stale() { 1 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(1),      // Header bar
        Constraint::Length(1),      // Tabs
        Constraint::Length(banner), // Stale data banner
        Constraint::Min(8),         // Content
        Constraint::Length(1),      // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);
    if banner > 0 {
        common::render_error_banner(frame, app, chunks[2]);
    }

    match app.view() {
        Some(view) => match app.current_view {
            View::Overview => overview::render(frame, app, view, chunks[3]),
            View::Gpus => gpus::render(frame, app, view, chunks[3]),
            View::Storage => storage::render(frame, app, view, chunks[3]),
            View::Services => services::render(frame, app, view, chunks[3]),
        },
        None => common::render_no_data(frame, app, chunks[3]),
    }

    common::render_status_bar(frame, app, chunks[4]);

    if let Some(ref form) = app.settings {
        settings::render_overlay(frame, app, form, area);
    }
    if app.show_help {
        common::render_help(frame, app, area);
    }
}
