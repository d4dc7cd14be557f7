//! HTTP fetcher for the monitoring endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{decode_payload, FetchError, FetchOutcome, MonitorTarget, TelemetryFetcher};
use crate::data::RawPayload;

/// Upper bound for one request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches telemetry with a plain `GET`; no body, no auth headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher using [`REQUEST_TIMEOUT`].
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<RawPayload, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await?;
        decode_payload(&body)
    }
}

#[async_trait]
impl TelemetryFetcher for HttpFetcher {
    async fn fetch(&self, target: &MonitorTarget) -> FetchOutcome {
        let Some(url) = target.url() else {
            debug!(%target, "monitor target not configured, skipping request");
            return FetchOutcome::EmptyConfig;
        };

        match self.get(&url).await {
            Ok(payload) => {
                debug!(%url, keys = payload.len(), "telemetry fetched");
                FetchOutcome::Success(payload)
            }
            Err(err) => {
                warn!(%url, error = %err, "telemetry fetch failed");
                FetchOutcome::Failure(err)
            }
        }
    }

    fn description(&self) -> String {
        "http".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on an ephemeral port.
    async fn serve_once(status_line: &str, body: &str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        port
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let port = serve_once("200 OK", r#"{"system": {"hostname": "rig"}}"#).await;
        let fetcher = HttpFetcher::new().unwrap();

        let outcome = fetcher.fetch(&MonitorTarget::new("127.0.0.1", Some(port))).await;
        match outcome {
            FetchOutcome::Success(payload) => assert!(payload.get("system").is_some()),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error_carries_status() {
        let port = serve_once("503 Service Unavailable", "{}").await;
        let fetcher = HttpFetcher::new().unwrap();

        let outcome = fetcher.fetch(&MonitorTarget::new("127.0.0.1", Some(port))).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failure(FetchError::Http {
                status: 503,
                reason: "Service Unavailable".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_non_object_body() {
        let port = serve_once("200 OK", "[1, 2]").await;
        let fetcher = HttpFetcher::new().unwrap();

        let outcome = fetcher.fetch(&MonitorTarget::new("127.0.0.1", Some(port))).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failure(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind and drop to get a port with nothing listening on it
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::new().unwrap();

        let outcome = fetcher.fetch(&MonitorTarget::new("127.0.0.1", Some(port))).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failure(FetchError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_without_config_makes_no_request() {
        let fetcher = HttpFetcher::new().unwrap();
        let outcome = fetcher.fetch(&MonitorTarget::new("", Some(5000))).await;
        assert_eq!(outcome, FetchOutcome::EmptyConfig);
    }
}
