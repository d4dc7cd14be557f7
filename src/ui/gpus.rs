//! GPU table.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use rigwatch_types::ViewModel;

use crate::app::App;
use crate::data::format::{format_gb, format_percent, sparkline};

pub fn render(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let header = Row::new(vec![
        "#", "Name", "Kind", "VRAM", "Used", "Util", "Temp", "Fan", "Trend",
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = view
        .gpus
        .iter()
        .map(|gpu| {
            let fan = gpu
                .fan_percent
                .map(format_percent)
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(gpu.index.to_string()),
                Cell::from(gpu.name.clone()),
                Cell::from(gpu.kind_label()),
                Cell::from(format!(
                    "{} / {}",
                    format_gb(gpu.memory_used_gib),
                    format_gb(gpu.memory_total_gib)
                )),
                Cell::from(format_percent(gpu.memory_percent()))
                    .style(app.theme.usage_style(gpu.memory_percent())),
                Cell::from(format_percent(gpu.utilization_percent))
                    .style(app.theme.usage_style(gpu.utilization_percent)),
                Cell::from(format!("{:.0}°C", gpu.temperature_celsius))
                    .style(app.theme.temperature_style(gpu.temperature_celsius)),
                Cell::from(fan),
                Cell::from(sparkline(&app.history.gpu_sparkline(gpu.index), 12)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(3),
        Constraint::Length(8),
        Constraint::Fill(2),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(12),
    ];

    let title = format!(
        " GPUs ({}) | VRAM {} / {} ",
        view.gpus.len(),
        format_gb(view.used_vram_gib()),
        format_gb(view.total_vram_gib())
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !view.gpus.is_empty() {
        state.select(Some(app.selected_gpu_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
