//! Failure taxonomy for remote server requests.

use thiserror::Error;

/// Primary error type for requests issued against a remote server.
///
/// The synchronization layer inspects [`RequestError::status`] to translate
/// recognized HTTP codes into screen-specific notifications; everything else
/// is surfaced verbatim for display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}")]
    Api {
        /// HTTP status code reported by the server.
        status: u16,
        /// Response body when the server included one.
        detail: Option<String>,
    },
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("network transport failed: {detail}")]
    Network {
        /// Human-readable transport failure description.
        detail: String,
    },
    /// The response arrived but its payload could not be decoded.
    #[error("response payload could not be decoded: {detail}")]
    Decode {
        /// Description of the malformed payload.
        detail: String,
    },
    /// The request exceeded the configured connection timeout.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout that elapsed, in seconds.
        seconds: u64,
    },
}

impl RequestError {
    /// Convenience constructor for an API failure without a body.
    #[must_use]
    pub const fn api(status: u16) -> Self {
        Self::Api {
            status,
            detail: None,
        }
    }

    /// HTTP status code associated with the failure, when the server
    /// produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for remote request results.
pub type RequestResult<T> = Result<T, RequestError>;
