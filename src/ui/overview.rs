//! Overview: host identity, resource usage, thermal/power and trends.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rigwatch_types::ViewModel;

use crate::app::App;
use crate::data::format::{format_gb, format_percent, format_uptime, sparkline};

const TREND_WIDTH: usize = 30;

fn block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn field<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().add_modifier(Modifier::DIM)),
        Span::raw(value.into()),
    ])
}

pub fn render(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let rows = Layout::vertical([Constraint::Min(8), Constraint::Length(7)]).split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_host(frame, app, view, top[0]);
    render_usage(frame, app, view, top[1]);
    render_trends(frame, app, view, rows[1]);
}

fn render_host(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let host = &view.host;
    let lines = vec![
        field("Host", host.hostname.clone()),
        field("OS", host.os_label()),
        field("Kernel", host.kernel.clone()),
        field("Arch", host.architecture.clone()),
        field("CPU", host.cpu_model.clone()),
        field("Python", host.python_version.clone()),
        field("PyTorch", host.pytorch_version.clone()),
        field("CUDA", host.cuda_version.clone()),
        field("Driver", host.driver_version.clone()),
    ];
    frame.render_widget(Paragraph::new(lines).block(block(app, " System ")), area);
}

fn render_usage(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let usage = &view.usage;
    let thermal = &view.thermal;

    let ambient = thermal
        .ambient_celsius
        .map(|c| format!("{:.1} °C", c))
        .unwrap_or_else(|| "n/a".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<10}", "CPU"), Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                format_percent(usage.cpu_percent),
                app.theme.usage_style(usage.cpu_percent),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<10}", "RAM"), Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                format!(
                    "{} / {} ({})",
                    format_gb(usage.ram_used_gb),
                    format_gb(usage.ram_total_gb),
                    format_percent(usage.ram_percent())
                ),
                app.theme.usage_style(usage.ram_percent()),
            ),
        ]),
        field("Uptime", format_uptime(usage.uptime_seconds)),
        Line::from(""),
        field("Ambient", ambient),
        field("Fans", format_percent(thermal.fan_percent)),
        field("Power", format!("{:.0} W", thermal.power_watts)),
    ];
    frame.render_widget(Paragraph::new(lines).block(block(app, " Usage ")), area);
}

fn render_trends(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let history = &app.history;
    let trend = |label: &'static str, levels: Vec<u8>| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                sparkline(&levels, TREND_WIDTH),
                Style::default().fg(app.theme.highlight),
            ),
        ])
    };

    let lines = vec![
        trend("CPU", history.cpu_sparkline()),
        trend("RAM", history.ram_sparkline(view.usage.ram_total_gb)),
        trend("Power", history.power_sparkline()),
        Line::from(Span::styled(
            format!("{} samples", history.len()),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block(app, " Trends ")), area);
}
