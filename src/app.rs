//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use rigwatch_types::ViewModel;

use crate::config::{ConfigStore, ConnectionConfig};
use crate::data::History;
use crate::poll::Dashboard;
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Host, usage, thermal readings and trends.
    Overview,
    /// Per-GPU table.
    Gpus,
    /// Volumes and reported paths.
    Storage,
    /// Image generation and LLM services, assets and workflows.
    Services,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Gpus, View::Storage, View::Services];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Gpus,
            View::Gpus => View::Storage,
            View::Storage => View::Services,
            View::Services => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Services,
            View::Gpus => View::Overview,
            View::Storage => View::Gpus,
            View::Services => View::Storage,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Gpus => "GPUs",
            View::Storage => "Storage",
            View::Services => "Services",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::Gpus => 1,
            View::Storage => 2,
            View::Services => 3,
        }
    }
}

/// Field being edited in the settings overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Host,
    MonitorPort,
    ImagePort,
    LlmPort,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Host,
        SettingsField::MonitorPort,
        SettingsField::ImagePort,
        SettingsField::LlmPort,
    ];

    pub fn next(self) -> Self {
        match self {
            SettingsField::Host => SettingsField::MonitorPort,
            SettingsField::MonitorPort => SettingsField::ImagePort,
            SettingsField::ImagePort => SettingsField::LlmPort,
            SettingsField::LlmPort => SettingsField::Host,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::Host => SettingsField::LlmPort,
            SettingsField::MonitorPort => SettingsField::Host,
            SettingsField::ImagePort => SettingsField::MonitorPort,
            SettingsField::LlmPort => SettingsField::ImagePort,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::Host => "Host",
            SettingsField::MonitorPort => "Monitor port",
            SettingsField::ImagePort => "ComfyUI port",
            SettingsField::LlmPort => "Ollama port",
        }
    }
}

/// Edit buffer behind the settings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub field: SettingsField,
    pub host: String,
    pub monitor_port: String,
    pub image_port: String,
    pub llm_port: String,
    /// Validation or save error shown under the fields.
    pub error: Option<String>,
}

fn port_text(port: Option<u16>) -> String {
    port.map(|p| p.to_string()).unwrap_or_default()
}

fn parse_port(field: SettingsField, text: &str) -> Result<Option<u16>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("{} must be a number between 1 and 65535", field.label())),
        Ok(port) => Ok(Some(port)),
    }
}

impl SettingsForm {
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            field: SettingsField::Host,
            host: config.host.clone(),
            monitor_port: port_text(config.monitor_port),
            image_port: port_text(config.image_port),
            llm_port: port_text(config.llm_port),
            error: None,
        }
    }

    pub fn value(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::Host => &self.host,
            SettingsField::MonitorPort => &self.monitor_port,
            SettingsField::ImagePort => &self.image_port,
            SettingsField::LlmPort => &self.llm_port,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.field {
            SettingsField::Host => &mut self.host,
            SettingsField::MonitorPort => &mut self.monitor_port,
            SettingsField::ImagePort => &mut self.image_port,
            SettingsField::LlmPort => &mut self.llm_port,
        }
    }

    /// Type a character into the focused field. Port fields only take digits.
    pub fn push(&mut self, c: char) {
        let accepts = match self.field {
            SettingsField::Host => !c.is_whitespace(),
            _ => c.is_ascii_digit(),
        };
        if accepts {
            self.value_mut().push(c);
            self.error = None;
        }
    }

    pub fn pop(&mut self) {
        self.value_mut().pop();
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    /// Apply the form to `config`, validating the port fields.
    pub fn apply_to(&self, config: &mut ConnectionConfig) -> Result<(), String> {
        let monitor_port = parse_port(SettingsField::MonitorPort, &self.monitor_port)?;
        let image_port = parse_port(SettingsField::ImagePort, &self.image_port)?;
        let llm_port = parse_port(SettingsField::LlmPort, &self.llm_port)?;

        config.host = self.host.trim().to_string();
        config.monitor_port = monitor_port;
        config.image_port = image_port;
        config.llm_port = llm_port;
        config.setup_completed = true;
        Ok(())
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub dashboard: Dashboard,
    pub history: History,

    // Navigation state
    pub selected_gpu_index: usize,
    pub selected_volume_index: usize,

    // Connection settings (absent when replaying a file)
    store: Option<Arc<ConfigStore>>,
    pub settings: Option<SettingsForm>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`.
    ///
    /// With a settings store the settings overlay opens straight away if the
    /// first-run setup has not been completed.
    pub fn new(source: Box<dyn DataSource>, store: Option<Arc<ConfigStore>>) -> Self {
        let settings = store
            .as_ref()
            .map(|s| s.current())
            .filter(ConnectionConfig::needs_setup)
            .map(|config| SettingsForm::from_config(&config));

        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            dashboard: Dashboard::default(),
            history: History::new(),
            selected_gpu_index: 0,
            selected_volume_index: 0,
            store,
            settings,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// The last good view model, if any.
    pub fn view(&self) -> Option<&ViewModel> {
        self.dashboard.view.as_ref()
    }

    /// Current connection settings, if a store is attached.
    pub fn connection(&self) -> Option<ConnectionConfig> {
        self.store.as_ref().map(|s| s.current())
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new dashboard.
    ///
    /// Returns true if something changed. History is restarted when the
    /// target changes and gains one sample per successful poll.
    pub fn reload_data(&mut self) -> bool {
        let Some(dashboard) = self.source.poll() else {
            return false;
        };

        if dashboard.target != self.dashboard.target {
            self.history.clear();
        }
        if dashboard.last_updated != self.dashboard.last_updated {
            if let (Some(view), Some(at)) = (&dashboard.view, dashboard.last_updated) {
                self.history.record(view, at);
            }
        }

        self.dashboard = dashboard;
        self.clamp_selection();
        true
    }

    fn clamp_selection(&mut self) {
        let (gpus, volumes) = self
            .view()
            .map(|v| (v.gpus.len(), v.storage.len()))
            .unwrap_or((0, 0));
        self.selected_gpu_index = self.selected_gpu_index.min(gpus.saturating_sub(1));
        self.selected_volume_index = self.selected_volume_index.min(volumes.saturating_sub(1));
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn list_len(&self) -> usize {
        match (self.current_view, self.view()) {
            (View::Gpus, Some(v)) => v.gpus.len(),
            (View::Storage, Some(v)) => v.storage.len(),
            _ => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_view {
            View::Gpus => Some(&mut self.selected_gpu_index),
            View::Storage => Some(&mut self.selected_volume_index),
            _ => None,
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let max = self.list_len().saturating_sub(1);
        if let Some(index) = self.selection_mut() {
            *index = (*index + 1).min(max);
        }
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        if let Some(index) = self.selection_mut() {
            *index = index.saturating_sub(1);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Open the settings overlay with the current connection settings.
    pub fn open_settings(&mut self) {
        match self.connection() {
            Some(config) => self.settings = Some(SettingsForm::from_config(&config)),
            None => self.set_status_message("Settings unavailable when reading a file".to_string()),
        }
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
    }

    /// Validate the settings overlay and write it to the store.
    ///
    /// On success the overlay closes; the polling controller picks up a
    /// changed monitor target from the store. On failure the overlay stays
    /// open with the error shown.
    pub fn save_settings(&mut self) {
        let (Some(form), Some(store)) = (self.settings.as_mut(), self.store.as_ref()) else {
            return;
        };

        let mut error = None;
        let result = store.update(|config| {
            if let Err(e) = form.apply_to(config) {
                error = Some(e);
            }
        });

        match (error, result) {
            (Some(e), _) => form.error = Some(e),
            (None, Err(e)) => form.error = Some(e.to_string()),
            (None, Ok(_)) => {
                self.settings = None;
                self.set_status_message("Settings saved".to_string());
            }
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current view model to a file as JSON.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(view) = self.view() else {
            anyhow::bail!("No data to export");
        };
        write_view(view, path)
    }
}

/// Write `view` to `path` as pretty-printed JSON.
pub fn write_view(view: &ViewModel, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(view)?;
    std::fs::write(path, json)?;
    Ok(())
}
