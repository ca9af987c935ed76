//! Upstream client error types.

/// Errors from the upstream HTTP client.
///
/// Non-2xx responses are not errors here; they come back as an
/// [`UpstreamResponse`](super::UpstreamResponse) with the status intact.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request did not complete (DNS failure, connection reset, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client could not be built from its configuration
    #[error("invalid upstream configuration: {message}")]
    Config { message: String },
}

impl UpstreamError {
    /// Whether the request gave up waiting for upstream.
    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Http(e) => e.is_timeout(),
            UpstreamError::Config { .. } => false,
        }
    }
}
