//! Parser Error Types
//!
//! Failures are scoped to a single link: the summary assembler logs them and
//! moves on to the next link.

use derive_more::{Display, Error};

/// A parser error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The text is not a link any parser handles; skip it silently.
    #[display("not a supported link: {_0}")]
    InvalidLink(#[error(not(source))] String),
    /// The page or metadata could not be retrieved.
    #[display("failed to fetch {_0}")]
    FetchFailure(#[error(not(source))] String),
    /// The page was retrieved but could not be turned into a work or series.
    #[display("failed to extract {_0}")]
    ExtractionFailure(#[error(not(source))] String),
    /// The resource needs a logged-in AO3 session that isn't available.
    #[display("authentication required for {_0}")]
    AuthRequired(#[error(not(source))] String),
    /// A series has no member at the requested position.
    #[display("series {series} has no work at position {position}")]
    NotFound { series: u64, position: usize },
    /// Processing of the message was abandoned.
    #[display("cancelled")]
    Cancelled,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailure(_))
    }
}
