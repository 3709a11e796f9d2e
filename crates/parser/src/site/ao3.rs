use super::{SiteParser, invalid_link};
use crate::cache::ParsedCache;
use crate::context::Context;
use crate::entity::{Entity, LinkMatch, SeriesEntity};
use crate::error::{ErrorKind, Result};
use abstractor_extract::models::{EntityKind, Site, UniqueKey, Work};
use abstractor_extract::{extract_series, extract_work, series_url, work_url};
use abstractor_fetch::Page;
use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument};

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:www\.)?archiveofourown\.org(?:/collections/[^/\s?#]+)?/(works|series|chapters)/(\d+)(?:$|[/?#])",
    )
    .unwrap()
});

/// Archive of Our Own works, chapters and series, extracted from the site's
/// own pages.
#[derive(Debug)]
pub struct Ao3Parser {
    context: Context,
    cache: ParsedCache,
}
impl Ao3Parser {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            cache: ParsedCache::default(),
        }
    }

    /// Resolves the 1-indexed `position` of `series` to a full work, fetching
    /// it on first use.
    #[instrument(skip(self, series), fields(series = series.series.id))]
    pub async fn series_member(&self, series: &SeriesEntity, position: usize) -> Result<Arc<Work>> {
        if let Some(work) = series.cached_member(position).await {
            return Ok(work);
        }
        let member = series.series.member(position).ok_or_raise(|| ErrorKind::NotFound {
            series: series.series.id,
            position,
        })?;
        let key = UniqueKey::work(Site::Ao3, member.id.to_string());
        let work = match self.cache.get(&key).and_then(Entity::as_work) {
            Some(work) => work.clone(),
            None => {
                let url = work_url(member.id);
                let page = self.context.fetch(&adult(&url)).await?;
                Arc::new(self.work_from(&url, &page)?)
            }
        };
        Ok(series.store_member(position, work).await)
    }

    fn work_from(&self, raw: &str, page: &Page) -> Result<Work> {
        extract_work(&page.body, Some(&page.final_url), page.restricted)
            .or_raise(|| ErrorKind::ExtractionFailure(raw.to_string()))
    }
}

/// Skips the adult content interstitial.
fn adult(url: &str) -> String {
    format!("{url}?view_adult=true")
}

#[async_trait]
impl SiteParser for Ao3Parser {
    fn site(&self) -> Site {
        Site::Ao3
    }

    fn recognize(&self, url: &str) -> Option<LinkMatch> {
        let captures = LINK_REGEX.captures(url)?;
        let id = captures.get(2)?.as_str();
        let kind = match captures.get(1)?.as_str().to_ascii_lowercase().as_str() {
            "works" => EntityKind::Work,
            "series" => EntityKind::Series,
            "chapters" => EntityKind::Chapter,
            _ => return None,
        };
        let canonical = match kind {
            EntityKind::Work => work_url(id.parse().ok()?),
            EntityKind::Series => series_url(id.parse().ok()?),
            EntityKind::Chapter => format!("https://archiveofourown.org/chapters/{id}"),
        };
        Some(LinkMatch {
            site: Site::Ao3,
            kind,
            id: id.to_string(),
            raw: url.to_string(),
            canonical,
        })
    }

    #[instrument(skip(self))]
    async fn parse(&mut self, url: &str) -> Result<Entity> {
        let link = self.recognize(url).ok_or_else(|| invalid_link(url))?;
        let key = link.key();
        if let Some(entity) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(entity.clone());
        }
        match link.kind {
            EntityKind::Series => {
                let page = self.context.fetch(&link.canonical).await?;
                let id = link.id.parse::<u64>().or_raise(|| ErrorKind::InvalidLink(link.raw.clone()))?;
                let series = extract_series(id, &page.body, page.restricted)
                    .or_raise(|| ErrorKind::ExtractionFailure(link.raw.clone()))?;
                Ok(self.cache.insert(key, series.into()))
            }
            EntityKind::Work => {
                let page = self.context.fetch(&adult(&link.canonical)).await?;
                let work = self.work_from(&link.raw, &page)?;
                Ok(self.cache.insert(key, work.into()))
            }
            EntityKind::Chapter => {
                // The owning work is only known once the chapter has been
                // fetched; it may already be cached under its own key.
                let page = self.context.fetch(&adult(&link.canonical)).await?;
                let work = self.work_from(&link.raw, &page)?;
                let work_key = work.key.clone();
                let entity = self.cache.insert(work_key.clone(), work.into());
                self.cache.alias(key, &work_key);
                Ok(entity)
            }
        }
    }

    fn cache(&self) -> &ParsedCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut ParsedCache {
        &mut self.cache
    }
}
