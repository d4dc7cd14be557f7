//! Storage volumes and reported paths.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use rigwatch_types::ViewModel;

use crate::app::App;
use crate::data::format::{format_gb, format_percent};

pub fn render(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let paths_height = (view.paths.len() as u16 + 2).clamp(3, 10);
    let chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(paths_height)]).split(area);

    render_volumes(frame, app, view, chunks[0]);
    render_paths(frame, app, view, chunks[1]);
}

fn render_volumes(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let header = Row::new(vec!["Path", "FS", "Total", "Used", "Free", "Use%", "Description"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = view
        .storage
        .iter()
        .map(|volume| {
            let used = volume.used_percent();
            Row::new(vec![
                Cell::from(volume.path.clone()),
                Cell::from(volume.filesystem.clone()),
                Cell::from(format_gb(volume.total_gb)),
                Cell::from(format_gb(volume.used_gb)),
                Cell::from(format_gb(volume.free_gb)),
                Cell::from(format_percent(used)).style(app.theme.usage_style(used)),
                Cell::from(volume.description.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Fill(2),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Volumes ({}) ", view.storage.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !view.storage.is_empty() {
        state.select(Some(app.selected_volume_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_paths(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let lines: Vec<Line> = if view.paths.is_empty() {
        vec![Line::from(Span::styled(
            "No paths reported",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        view.paths
            .iter()
            .map(|(name, path)| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", name), Style::default().add_modifier(Modifier::DIM)),
                    Span::raw(path.clone()),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(" Paths ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
