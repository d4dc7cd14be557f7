//! Connection settings and their persistent store.
//!
//! Settings live in a small JSON file (by default
//! `<config dir>/rigwatch/settings.json`). They are loaded once with the
//! `config` crate, so `RIGWATCH_*` environment variables can override any key,
//! and written back on every change. Consumers observe changes through a
//! [`watch`] channel.
//!
//! ```json
//! {
//!   "host": "192.168.1.20",
//!   "monitor_port": 5000,
//!   "image_port": 8188,
//!   "llm_port": 11434,
//!   "setup_completed": true
//! }
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::fetch::MonitorTarget;

/// Default port of the image generation service (ComfyUI).
pub const DEFAULT_IMAGE_PORT: u16 = 8188;
/// Default port of the local LLM service (Ollama).
pub const DEFAULT_LLM_PORT: u16 = 11434;

/// User-supplied connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Host name or IP of the machine running the monitor.
    pub host: String,
    /// Port of the monitoring endpoint. Unset until the user configures it.
    pub monitor_port: Option<u16>,
    pub image_port: Option<u16>,
    pub llm_port: Option<u16>,
    /// Whether the first-run setup prompt has been completed.
    pub setup_completed: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            monitor_port: None,
            image_port: Some(DEFAULT_IMAGE_PORT),
            llm_port: Some(DEFAULT_LLM_PORT),
            setup_completed: false,
        }
    }
}

impl ConnectionConfig {
    /// The monitoring endpoint these settings point at.
    pub fn monitor_target(&self, path: &str) -> MonitorTarget {
        MonitorTarget::new(self.host.trim(), self.monitor_port).with_path(path)
    }

    /// `host:port` of a dependent service, if both are known.
    pub fn service_address(&self, port: Option<u16>) -> Option<String> {
        let host = self.host.trim();
        match (host.is_empty(), port) {
            (false, Some(port)) => Some(format!("{}:{}", host, port)),
            _ => None,
        }
    }

    /// Whether the first-run setup prompt should be shown.
    pub fn needs_setup(&self) -> bool {
        !self.setup_completed || self.host.trim().is_empty() || self.monitor_port.is_none()
    }
}

/// Errors loading or saving settings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Holds the current [`ConnectionConfig`], persists it, and notifies
/// subscribers when it changes.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    state: watch::Sender<ConnectionConfig>,
}

impl ConfigStore {
    /// The per-user settings file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rigwatch").join("settings.json"))
    }

    /// Open the store backed by `path`, loading existing settings.
    ///
    /// A missing file is not an error; defaults are used until the first
    /// change is written.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let initial = Self::load(&path)?;
        debug!(path = %path.display(), ?initial, "settings loaded");

        let (state, _) = watch::channel(initial);
        Ok(Self { path, state })
    }

    fn load(path: &Path) -> Result<ConnectionConfig, StoreError> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(Environment::with_prefix("RIGWATCH").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the current settings.
    pub fn current(&self) -> ConnectionConfig {
        self.state.borrow().clone()
    }

    /// Subscribe to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionConfig> {
        self.state.subscribe()
    }

    /// Apply `change`, persist the result and notify subscribers.
    ///
    /// Nothing is written or published if `change` leaves the settings as
    /// they were. If writing fails the in-memory settings stay unchanged.
    pub fn update<F>(&self, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut ConnectionConfig),
    {
        let mut next = self.current();
        change(&mut next);
        if next == *self.state.borrow() {
            return Ok(false);
        }

        self.persist(&next)?;
        info!(host = %next.host, monitor_port = ?next.monitor_port, "connection settings changed");
        self.state.send_replace(next);
        Ok(true)
    }

    pub fn set_host(&self, host: impl Into<String>) -> Result<bool, StoreError> {
        let host = host.into();
        self.update(|c| c.host = host.trim().to_string())
    }

    pub fn set_monitor_port(&self, port: Option<u16>) -> Result<bool, StoreError> {
        self.update(|c| c.monitor_port = port)
    }

    pub fn set_image_port(&self, port: Option<u16>) -> Result<bool, StoreError> {
        self.update(|c| c.image_port = port)
    }

    pub fn set_llm_port(&self, port: Option<u16>) -> Result<bool, StoreError> {
        self.update(|c| c.llm_port = port)
    }

    pub fn mark_setup_completed(&self) -> Result<bool, StoreError> {
        self.update(|c| c.setup_completed = true)
    }

    fn persist(&self, config: &ConnectionConfig) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json).map_err(write_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::open(dir.path().join("settings.json")).unwrap()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let config = store.current();
        assert_eq!(config, ConnectionConfig::default());
        assert!(config.needs_setup());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_changes_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.set_host(" 192.168.1.20 ").unwrap());
        assert!(store.set_monitor_port(Some(5000)).unwrap());
        assert!(store.set_llm_port(Some(11500)).unwrap());
        assert!(store.mark_setup_completed().unwrap());

        let reloaded = store_in(&dir).current();
        assert_eq!(reloaded.host, "192.168.1.20");
        assert_eq!(reloaded.monitor_port, Some(5000));
        assert_eq!(reloaded.image_port, Some(DEFAULT_IMAGE_PORT));
        assert_eq!(reloaded.llm_port, Some(11500));
        assert!(reloaded.setup_completed);
        assert!(!reloaded.needs_setup());
    }

    #[test]
    fn test_unchanged_update_is_not_written() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.set_image_port(Some(DEFAULT_IMAGE_PORT)).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut rx = store.subscribe();

        assert!(!rx.has_changed().unwrap());
        store.set_host("rig.local").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().host, "rig.local");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"host": "rig", "monitor_port": 5000}"#).unwrap();

        let config = ConfigStore::open(&path).unwrap().current();
        assert_eq!(config.host, "rig");
        assert_eq!(config.monitor_port, Some(5000));
        assert_eq!(config.llm_port, Some(DEFAULT_LLM_PORT));
        assert!(!config.setup_completed);
    }

    #[test]
    fn test_monitor_target_and_service_address() {
        let config = ConnectionConfig {
            host: "rig".to_string(),
            monitor_port: Some(5000),
            ..ConnectionConfig::default()
        };

        assert_eq!(
            config.monitor_target("/api/sysmon").url().as_deref(),
            Some("http://rig:5000/api/sysmon")
        );
        assert_eq!(
            config.service_address(config.image_port).as_deref(),
            Some("rig:8188")
        );
        assert_eq!(config.service_address(None), None);
        assert_eq!(ConnectionConfig::default().service_address(Some(1)), None);
    }
}
