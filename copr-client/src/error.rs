//! Error types for the Copr client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to Copr
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, DNS, TLS, timeout...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Copr answered, but `output` was not "ok"
    #[error("Copr rejected the request: {0}")]
    Rejected(String),

    /// A successful submission that named no build
    #[error("Copr accepted the build but returned no build id")]
    MissingBuildId,

    /// A successful status query without a status
    #[error("Copr returned no status for build {0}")]
    MissingStatus(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ClientError::api_error(404, "Copr not found");
        assert_eq!(err.to_string(), "API error (status 404): Copr not found");
    }
}
