//! Error types for telemetry fetches.

use thiserror::Error;

/// Why a fetch did not produce a payload.
///
/// Missing connection settings are not an error here; they are reported as
/// [`FetchOutcome::EmptyConfig`](super::FetchOutcome::EmptyConfig) before any
/// request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not complete (DNS, refused connection, reset).
    #[error("Service unreachable: {0}")]
    Network(String),

    /// No response within the request timeout.
    #[error("Service unreachable: request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("{}", http_message(*status, reason))]
    Http { status: u16, reason: String },

    /// The body was not JSON, or not a JSON object.
    #[error("Malformed response: {0}")]
    Decode(String),
}

fn http_message(status: u16, reason: &str) -> String {
    if reason.is_empty() {
        format!("HTTP error {}", status)
    } else {
        format!("HTTP error {} {}", status, reason)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_message_includes_status_text() {
        let err = FetchError::Http {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 503 Service Unavailable");
    }

    #[test]
    fn test_http_message_without_status_text() {
        let err = FetchError::Http {
            status: 599,
            reason: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP error 599");
    }
}
