//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered with a non-success status.
    #[display("unexpected status: {_0}")]
    Status(#[error(not(source))] u16),
    /// Connection, TLS or protocol failure.
    #[display("network error")]
    Network,
    /// The request did not complete within the configured timeout.
    #[display("request timed out")]
    Timeout,
    /// The resource is only visible to logged-in users and no usable session
    /// is available.
    #[display("authentication required")]
    AuthRequired,
    /// Logging in with the configured credentials failed.
    #[display("login failed")]
    Login,
    /// The response body could not be read as text.
    #[display("failed to decode response body")]
    Decode,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Timeout => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::AuthRequired | Self::Login | Self::Decode => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable() {
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Status(503).is_retryable());
        assert!(ErrorKind::Status(429).is_retryable());
        assert!(!ErrorKind::Status(404).is_retryable());
        assert!(!ErrorKind::AuthRequired.is_retryable());
    }
}
