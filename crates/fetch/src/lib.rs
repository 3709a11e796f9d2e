//! Page retrieval for the site parsers.
//!
//! Everything network-bound sits behind the [`Fetcher`] trait so the parsers
//! can be exercised against canned pages (see `MockFetcher`, behind the
//! `mock` feature).

pub mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod session;

pub use crate::http::{HttpConfig, HttpFetcher};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{MockFetcher, MockResponse};
pub use crate::session::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A successfully retrieved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The URL that was requested.
    pub url: String,
    /// Where the response was finally served from, after redirects.
    pub final_url: String,
    pub body: String,
    /// Only visible with a logged-in AO3 session.
    pub restricted: bool,
}

/// Unified interface for retrieving pages.
///
/// Implementations follow redirects and treat non-success statuses as
/// errors. A restricted AO3 page is either retrieved with a logged-in session
/// (and flagged as [`restricted`](Page::restricted)) or fails with
/// [`ErrorKind::AuthRequired`](crate::error::ErrorKind::AuthRequired).
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Name of the fetcher (for logging only).
    fn name(&self) -> &str;

    /// GET `url`.
    async fn fetch(&self, url: &str) -> Result<Page>;
}

pub type FetcherHandle = Arc<dyn Fetcher>;
