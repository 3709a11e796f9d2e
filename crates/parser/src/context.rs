use crate::error::{ErrorKind, Result};
use abstractor_fetch::error::ErrorKind as FetchErrorKind;
use abstractor_fetch::{FetcherHandle, Page};
use exn::ResultExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Everything a site parser needs to retrieve pages for one message.
#[derive(Clone)]
pub struct Context {
    fetcher: FetcherHandle,
    fichub_api: Arc<str>,
    cancel: CancellationToken,
}
impl Context {
    pub fn new(fetcher: FetcherHandle, fichub_api: impl Into<Arc<str>>) -> Self {
        Self {
            fetcher,
            fichub_api: fichub_api.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Abandons in-flight and future fetches once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// FicHub metadata query for a story URL.
    pub(crate) fn fichub_url(&self, source: &str) -> String {
        format!("{}?q={source}", self.fichub_api)
    }

    /// Fetches `url`, racing the request against cancellation.
    pub(crate) async fn fetch(&self, url: &str) -> Result<Page> {
        debug!(fetcher = self.fetcher.name(), url, "fetching");
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => exn::bail!(ErrorKind::Cancelled),
            result = self.fetcher.fetch(url) => result,
        };
        let kind = match &result {
            Err(err) if matches!(&**err, FetchErrorKind::AuthRequired) => ErrorKind::AuthRequired(url.to_string()),
            _ => ErrorKind::FetchFailure(url.to_string()),
        };
        result.or_raise(|| kind)
    }
}
impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fetcher", &self.fetcher.name())
            .field("fichub_api", &self.fichub_api)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
