//! In-memory fetcher for testing.

use crate::error::{ErrorKind, Result};
use crate::{Fetcher, Page};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A canned response for [`MockFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Served as-is from the requested URL.
    Body(String),
    /// Served after a redirect to `final_url`.
    Redirect { final_url: String, body: String },
    /// Served from a logged-in session only.
    Restricted(String),
    /// Fails with [`ErrorKind::Status`].
    Status(u16),
    /// Fails with [`ErrorKind::Timeout`].
    Timeout,
    /// Fails with [`ErrorKind::AuthRequired`].
    AuthRequired,
}

/// In-memory fetcher for testing.
///
/// Responses are looked up by exact URL; anything unknown is a `404`. Every
/// request is counted, so tests can assert how often a URL was fetched.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: RwLock<HashMap<String, MockResponse>>,
    hits: RwLock<HashMap<String, usize>>,
}

impl MockFetcher {
    /// Create a mock fetcher pre-populated with successful pages.
    pub fn with_pages(pages: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let responses = pages.into_iter().map(|(url, body)| (url.into(), MockResponse::Body(body.into()))).collect();
        Self {
            responses: RwLock::new(responses),
            hits: RwLock::default(),
        }
    }

    /// Add (or replace) the response for `url`.
    pub fn with_response(mut self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses.get_mut().insert(url.into(), response);
        self
    }

    /// Add (or replace) the response for `url` while the fetcher is shared.
    pub async fn set_response(&self, url: impl Into<String>, response: MockResponse) {
        self.responses.write().await.insert(url.into(), response);
    }

    /// Number of times `url` was requested.
    pub async fn hits(&self, url: &str) -> usize {
        self.hits.read().await.get(url).copied().unwrap_or(0)
    }

    /// Number of requests across all URLs.
    pub async fn total_hits(&self) -> usize {
        self.hits.read().await.values().sum()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<Page> {
        *self.hits.write().await.entry(url.to_string()).or_default() += 1;
        let response = self.responses.read().await.get(url).cloned().unwrap_or(MockResponse::Status(404));
        let (final_url, body, restricted) = match response {
            MockResponse::Body(body) => (url.to_string(), body, false),
            MockResponse::Redirect { final_url, body } => (final_url, body, false),
            MockResponse::Restricted(body) => (url.to_string(), body, true),
            MockResponse::Status(status) => exn::bail!(ErrorKind::Status(status)),
            MockResponse::Timeout => exn::bail!(ErrorKind::Timeout),
            MockResponse::AuthRequired => exn::bail!(ErrorKind::AuthRequired),
        };
        Ok(Page {
            url: url.to_string(),
            final_url,
            body,
            restricted,
        })
    }
}
