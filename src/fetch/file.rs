//! File-based fetcher.
//!
//! Reads a saved monitoring payload from disk on every fetch. Useful for
//! replaying a captured response or for running without a backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use super::{decode_payload, FetchError, FetchOutcome, MonitorTarget, TelemetryFetcher};

/// A fetcher that ignores the target and reads a JSON payload file instead.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    /// Create a fetcher for the given payload file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TelemetryFetcher for FileFetcher {
    async fn fetch(&self, _target: &MonitorTarget) -> FetchOutcome {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "payload file unreadable");
                return FetchOutcome::Failure(FetchError::Network(format!("Read error: {}", e)));
            }
        };

        match decode_payload(&content) {
            Ok(payload) => FetchOutcome::Success(payload),
            Err(err) => FetchOutcome::Failure(err),
        }
    }

    fn description(&self) -> String {
        format!("file: {}", self.path.display())
    }
}
