//! Telemetry fetching.
//!
//! A fetch is one request against the monitoring endpoint, classified into a
//! [`FetchOutcome`]. Fetchers never retry; the polling controller repeats
//! the request on its own schedule.
//!
//! Two implementations are provided:
//!
//! - [`HttpFetcher`]: `GET http://{host}:{port}/api/sysmon`
//! - [`FileFetcher`]: reads a saved payload from disk (offline and replay use)

mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::FileFetcher;
pub use http::{HttpFetcher, REQUEST_TIMEOUT};

use std::fmt::{self, Debug};

use async_trait::async_trait;
use serde_json::Value;

use crate::data::RawPayload;

/// Path of the monitoring endpoint on the configured host.
pub const DEFAULT_PATH: &str = "/api/sysmon";

/// Where the monitoring endpoint lives.
///
/// An empty host or a missing port means the user has not finished
/// configuring the connection yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorTarget {
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
}

impl MonitorTarget {
    /// Create a target using [`DEFAULT_PATH`].
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Override the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Whether both host and port are set.
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty() && self.port.is_some()
    }

    /// Full request URL, or `None` if the target is not configured.
    pub fn url(&self) -> Option<String> {
        let port = self.port?;
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return None;
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Some(format!("{}:{}{}", host, port, self.path))
        } else {
            Some(format!("http://{}:{}{}", host, port, self.path))
        }
    }
}

impl fmt::Display for MonitorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host.trim(), self.port) {
            ("", _) => write!(f, "not configured"),
            (host, Some(port)) => write!(f, "{}:{}", host, port),
            (host, None) => write!(f, "{}:?", host),
        }
    }
}

/// Result of a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The endpoint returned a JSON object.
    Success(RawPayload),
    /// Host or port not configured; no request was made.
    EmptyConfig,
    /// The request failed or the body could not be decoded.
    Failure(FetchError),
}

/// Performs one telemetry fetch.
///
/// Implementations must not mutate shared state; the caller decides what to
/// do with the outcome.
#[async_trait]
pub trait TelemetryFetcher: Send + Sync + Debug {
    /// Fetch the payload for `target`.
    async fn fetch(&self, target: &MonitorTarget) -> FetchOutcome;

    /// Human-readable description of where payloads come from.
    fn description(&self) -> String;
}

/// Decode a response body into a payload.
///
/// The body must be a JSON object; arrays, scalars and invalid JSON are
/// decode failures.
pub fn decode_payload(body: &[u8]) -> Result<RawPayload, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let kind = json_kind(&value);
    RawPayload::from_value(value)
        .ok_or_else(|| FetchError::Decode(format!("expected a JSON object, got {}", kind)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
