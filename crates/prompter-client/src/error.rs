//! Error types for the broker client.

/// Errors that can occur when talking to the broker.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    /// (broker not running, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The broker's response body is not the expected JSON.
    #[error("failed to decode broker response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The broker answered with a non-success status.
    #[error("broker returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Plain-text reason from the broker.
        body: String,
    },
}

impl ClientError {
    /// Whether the broker reported the prompt id as unknown.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
