//! AI services, asset inventory and workflows.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use rigwatch_types::{ServiceStatus, ViewModel};

use crate::app::App;

/// Artifact names listed per service before truncating.
const MAX_ARTIFACTS: usize = 8;

fn block<'a>(app: &App, title: String) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

pub fn render(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let rows = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);
    let services = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let inventory = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let connection = app.connection();
    let image_address = connection
        .as_ref()
        .and_then(|c| c.service_address(c.image_port));
    let llm_address = connection
        .as_ref()
        .and_then(|c| c.service_address(c.llm_port));

    render_service(
        frame,
        app,
        "ComfyUI",
        &view.services.image_generation,
        image_address,
        services[0],
    );
    render_service(frame, app, "Ollama", &view.services.llm, llm_address, services[1]);
    render_assets(frame, app, view, inventory[0]);
    render_workflows(frame, app, view, inventory[1]);
}

fn render_service(
    frame: &mut Frame,
    app: &App,
    name: &str,
    status: &ServiceStatus,
    address: Option<String>,
    area: Rect,
) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status   ", dim),
            Span::styled(status.state.label(), app.theme.service_style(status.state)),
        ]),
        Line::from(vec![Span::styled("Version  ", dim), Span::raw(status.version.clone())]),
    ];
    if let Some(address) = address {
        lines.push(Line::from(vec![Span::styled("Address  ", dim), Span::raw(address)]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Models ({})", status.artifacts.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.extend(
        status
            .artifacts
            .iter()
            .take(MAX_ARTIFACTS)
            .map(|artifact| Line::from(format!("  {}", artifact))),
    );
    if status.artifacts.len() > MAX_ARTIFACTS {
        lines.push(Line::from(Span::styled(
            format!("  … {} more", status.artifacts.len() - MAX_ARTIFACTS),
            dim,
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block(app, format!(" {} ", name))),
        area,
    );
}

fn render_assets(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let lines: Vec<Line> = view
        .assets
        .counts()
        .iter()
        .map(|(label, count)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", label), Style::default().add_modifier(Modifier::DIM)),
                Span::raw(count.to_string()),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(block(app, " Assets ".to_string())),
        area,
    );
}

fn render_workflows(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    let text = if view.workflows.is_empty() {
        Line::from(Span::styled(
            "No workflows reported",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(view.workflows.join(", "))
    };

    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(block(app, format!(" Workflows ({}) ", view.workflows.len()))),
        area,
    );
}
