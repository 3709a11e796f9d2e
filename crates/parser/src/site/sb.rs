use super::{SiteParser, invalid_link, parse_fichub};
use crate::cache::ParsedCache;
use crate::context::Context;
use crate::entity::{Entity, LinkMatch};
use crate::error::Result;
use abstractor_extract::models::{EntityKind, Site};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

/// The slug is `title.<id>` or a bare `<id>`; page, post and anchor suffixes
/// after it are ignored.
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://forums\.spacebattles\.com/threads/((?:[^/\s?#]*\.)?(\d+))(?:$|[/?#])").unwrap()
});

/// SpaceBattles threads, described through FicHub.
#[derive(Debug)]
pub struct SbParser {
    context: Context,
    cache: ParsedCache,
}
impl SbParser {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            cache: ParsedCache::default(),
        }
    }
}

#[async_trait]
impl SiteParser for SbParser {
    fn site(&self) -> Site {
        Site::SpaceBattles
    }

    fn recognize(&self, url: &str) -> Option<LinkMatch> {
        let captures = LINK_REGEX.captures(url)?;
        let slug = captures.get(1)?.as_str();
        let id = captures.get(2)?.as_str();
        Some(LinkMatch {
            site: Site::SpaceBattles,
            kind: EntityKind::Work,
            id: id.to_string(),
            raw: url.to_string(),
            canonical: format!("https://forums.spacebattles.com/threads/{slug}/"),
        })
    }

    #[instrument(skip(self))]
    async fn parse(&mut self, url: &str) -> Result<Entity> {
        let link = self.recognize(url).ok_or_else(|| invalid_link(url))?;
        parse_fichub(&self.context, &mut self.cache, link).await
    }

    fn cache(&self) -> &ParsedCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut ParsedCache {
        &mut self.cache
    }
}
