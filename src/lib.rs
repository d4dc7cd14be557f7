//! # rigwatch
//!
//! A terminal dashboard and library for AI workstation telemetry.
//!
//! The crate polls a monitoring endpoint on the workstation, normalizes
//! whatever JSON it returns into a fully defaulted
//! [`ViewModel`](rigwatch_types::ViewModel), and renders host, GPU, storage
//! and AI service status in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//!  config ──(watch)──▶ PollController ──▶ TelemetryFetcher (Http | File)
//!                           │                    │
//!                           │◀──── RawPayload ───┘
//!                           ▼
//!                       normalize ──▶ Dashboard ──(watch)──▶ ChannelSource
//!                                                                │
//!                                      ui ◀── app (state) ◀──────┘
//! ```
//!
//! - **[`config`]**: connection settings, persisted and observable
//! - **[`fetch`]**: one request, classified into a [`FetchOutcome`]
//! - **[`data`]**: the payload normalizer and sparkline history
//! - **[`poll`]**: the polling cycle, reconfigure and teardown
//! - **[`source`]**: non-blocking access to the published [`Dashboard`]
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal UI
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a workstation (host and port are remembered)
//! rigwatch --host 192.168.1.20 --port 5000
//!
//! # Replay a captured payload
//! rigwatch --file sysmon.json
//!
//! # One-shot export of the normalized view model
//! rigwatch --export telemetry.json
//! ```
//!
//! ### Normalizing a payload
//!
//! ```
//! use rigwatch::{normalize, Heuristics, RawPayload};
//!
//! let payload = RawPayload::from_value(serde_json::json!({
//!     "gpus": [{ "name": "RTX 4090", "memory_total": 24564 }],
//!     "services": { "ollama": { "status": "running" } }
//! }))
//! .unwrap();
//!
//! let view = normalize(&payload, &Heuristics::default());
//! assert_eq!(view.gpus[0].memory_total_gib.round(), 24.0);
//! assert_eq!(view.host.hostname, "unknown");
//! ```
//!
//! ### Polling from a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use rigwatch::{App, ChannelSource, Heuristics, HttpFetcher, MonitorTarget, PollController};
//!
//! # tokio_test::block_on(async {
//! let fetcher = Arc::new(HttpFetcher::new().unwrap());
//! let controller = PollController::new(fetcher, Heuristics::default());
//! controller.reconfigure(MonitorTarget::new("192.168.1.20", Some(5000)));
//!
//! let source = ChannelSource::from_controller(&controller);
//! let app = App::new(Box::new(source), None);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod fetch;
pub mod logging;
pub mod poll;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{ConfigStore, ConnectionConfig, StoreError};
pub use data::{normalize, Heuristics, History, RawPayload};
pub use fetch::{
    FetchError, FetchOutcome, FileFetcher, HttpFetcher, MonitorTarget, TelemetryFetcher,
};
pub use poll::{Dashboard, Phase, PollController, POLL_PERIOD};
pub use source::{ChannelSource, DataSource};
