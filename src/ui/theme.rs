//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use rigwatch_types::ServiceState;

/// Usage percentage at which a gauge turns to the warning color.
pub const USAGE_WARNING: f64 = 75.0;
/// Usage percentage at which a gauge turns to the critical color.
pub const USAGE_CRITICAL: f64 = 90.0;
/// GPU temperature (°C) thresholds.
pub const TEMP_WARNING: f64 = 75.0;
pub const TEMP_CRITICAL: f64 = 85.0;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    pub warning: Color,
    pub critical: Color,
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a service status label.
    pub fn service_style(&self, state: ServiceState) -> Style {
        match state {
            ServiceState::Running => Style::default().fg(self.healthy),
            ServiceState::Stopped => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            ServiceState::Unknown => Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Style for a 0-100 usage value.
    pub fn usage_style(&self, percent: f64) -> Style {
        self.level_style(percent, USAGE_WARNING, USAGE_CRITICAL)
    }

    pub fn temperature_style(&self, celsius: f64) -> Style {
        self.level_style(celsius, TEMP_WARNING, TEMP_CRITICAL)
    }

    fn level_style(&self, value: f64, warning: f64, critical: f64) -> Style {
        if value >= critical {
            Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
        } else if value >= warning {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.healthy)
        }
    }
}
