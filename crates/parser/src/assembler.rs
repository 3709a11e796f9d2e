use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::links::LinkScanner;
use crate::reaction::{resolve_reaction, series_id};
use crate::registry::GlobalParser;
use crate::render::render_work;
use crate::site::{Ao3Parser, SiteParser};
use abstractor_extract::series_url;
use abstractor_fetch::FetcherHandle;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Default number of summaries posted per message.
pub const DEFAULT_MAX_LINKS: usize = 3;

/// Turns chat messages into summaries of the fics they link to.
///
/// Every message is handled with its own [`GlobalParser`], so nothing parsed
/// for one message is visible to another; only the fetcher (and its AO3
/// session) is shared.
#[derive(Clone)]
pub struct Abstractor {
    fetcher: FetcherHandle,
    fichub_api: Arc<str>,
    scanner: LinkScanner,
    max_links: usize,
}
impl Abstractor {
    pub fn new(fetcher: FetcherHandle, fichub_api: impl Into<Arc<str>>) -> Self {
        Self {
            fetcher,
            fichub_api: fichub_api.into(),
            scanner: LinkScanner::default(),
            max_links: DEFAULT_MAX_LINKS,
        }
    }

    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    /// Links directly preceded by `prefix` are left alone.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scanner = LinkScanner::new(prefix);
        self
    }

    fn context(&self, cancel: &CancellationToken) -> Context {
        Context::new(self.fetcher.clone(), self.fichub_api.clone()).with_cancellation(cancel.clone())
    }

    /// Summaries for the supported links in `text`, in order, at most
    /// `max_links` of them.
    ///
    /// Links that fail are logged and skipped. Links after the `max_links`-th
    /// distinct entity are left unfetched. Once `cancel` fires nothing is
    /// returned.
    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn summarize(&self, text: &str, cancel: &CancellationToken) -> Vec<String> {
        let links: Vec<&str> = self.scanner.scan(text).collect();
        let found = links.len();
        let mut registry = GlobalParser::new(self.context(cancel));
        for link in links {
            if cancel.is_cancelled() {
                break;
            }
            if registry.parsed_count() >= self.max_links {
                debug!(link, max_links = self.max_links, "limit reached, ignoring remaining links");
                break;
            }
            match registry.parse(link).await {
                Ok(Some(entity)) => debug!(link, site = %entity.site(), "parsed"),
                Ok(None) => debug!(link, "skipping unsupported link"),
                Err(err) if matches!(&*err, ErrorKind::Cancelled) => break,
                Err(err) => warn!(link, error = ?err, "skipping link"),
            }
        }
        if cancel.is_cancelled() {
            info!("message abandoned");
            return Vec::new();
        }
        let summaries = registry.generate_summaries(self.max_links);
        info!(found, parsed = registry.parsed_count(), summaries = summaries.len(), "summarized message");
        summaries
    }

    /// The summary of the series member selected by `reaction` on a previous
    /// series summary.
    ///
    /// `None` when the reaction isn't a member number, the message isn't a
    /// series summary, or the series has no such member.
    #[instrument(skip(self, message, cancel))]
    pub async fn react(&self, message: &str, reaction: &str, cancel: &CancellationToken) -> Result<Option<String>> {
        let (Some(position), Some(id)) = (resolve_reaction(reaction), series_id(message)) else {
            debug!("not a series member reaction");
            return Ok(None);
        };
        let mut parser = Ao3Parser::new(self.context(cancel));
        let entity = parser.parse(&series_url(id)).await?;
        let Some(series) = entity.as_series() else {
            return Ok(None);
        };
        match parser.series_member(series, position).await {
            Ok(work) => Ok(Some(render_work(&work))),
            Err(err) if matches!(&*err, ErrorKind::NotFound { .. }) => {
                debug!(error = %err, "no such member");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
impl std::fmt::Debug for Abstractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Abstractor")
            .field("fetcher", &self.fetcher.name())
            .field("fichub_api", &self.fichub_api)
            .field("scanner", &self.scanner)
            .field("max_links", &self.max_links)
            .finish()
    }
}
