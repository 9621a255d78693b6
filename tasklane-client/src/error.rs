//! Error types for the Tasklane client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the job backend
///
/// `RequestFailed` and `ApiError` are transport failures: the call did not
/// produce a usable response. `ParseError` is a protocol failure: a response
/// arrived but does not match the contract.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned a non-2xx status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnosis
        message: String,
    },

    /// Response could not be decoded into the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Network failure or non-2xx status
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(_) | Self::ApiError { .. })
    }

    /// Response arrived but violates the wire contract
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// Check if the request hit its per-call timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
