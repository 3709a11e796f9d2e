//! Per-site link recognition and parsing.
//!
//! Each parser owns the cache of entities it has parsed for the current
//! message; the [`GlobalParser`](crate::GlobalParser) routes links to the
//! first parser that recognizes them.

mod ao3;
mod ffn;
mod sb;

pub use self::ao3::Ao3Parser;
pub use self::ffn::FfnParser;
pub use self::sb::SbParser;
use crate::cache::ParsedCache;
use crate::context::Context;
use crate::entity::{Entity, LinkMatch};
use crate::error::{ErrorKind, Result};
use abstractor_extract::models::Site;
use async_trait::async_trait;
use exn::ResultExt;
use tracing::debug;

/// Common contract of the site parsers.
#[async_trait]
pub trait SiteParser: Send + Sync {
    fn site(&self) -> Site;

    /// Strict syntactic check, normalizing the link into a key and the URL
    /// it is retrieved through. Never touches the network.
    fn recognize(&self, url: &str) -> Option<LinkMatch>;

    fn is_valid_link(&self, url: &str) -> bool {
        self.recognize(url).is_some()
    }

    /// Returns the cached entity for `url`, fetching and caching it first if
    /// it hasn't been parsed yet.
    async fn parse(&mut self, url: &str) -> Result<Entity>;

    fn cache(&self) -> &ParsedCache;

    fn cache_mut(&mut self) -> &mut ParsedCache;

    /// Summaries of up to `limit` parsed entities, in the order they were
    /// first parsed.
    fn generate_summaries(&self, limit: usize) -> Vec<String> {
        self.cache().summaries(limit)
    }

    fn parsed_count(&self) -> usize {
        self.cache().len()
    }

    fn clear(&mut self) {
        self.cache_mut().clear();
    }
}

fn invalid_link(url: &str) -> exn::Exn<ErrorKind> {
    exn::Exn::from(ErrorKind::InvalidLink(url.to_string()))
}

/// Shared by the sites whose metadata comes from FicHub rather than the site
/// itself.
async fn parse_fichub(context: &Context, cache: &mut ParsedCache, link: LinkMatch) -> Result<Entity> {
    let key = link.key();
    if let Some(entity) = cache.get(&key) {
        debug!(%key, "cache hit");
        return Ok(entity.clone());
    }
    let page = context.fetch(&context.fichub_url(&link.canonical)).await?;
    let work = abstractor_extract::extract_fichub(&page.body, key.clone(), &link.canonical)
        .or_raise(|| ErrorKind::ExtractionFailure(link.raw.clone()))?;
    Ok(cache.insert(key, work.into()))
}
