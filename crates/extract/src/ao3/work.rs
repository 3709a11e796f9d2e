use super::{Datalist, authors_in, element_text, work_url};
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::format::format_element;
use crate::models::{Author, Site, UniqueKey, Work};
use exn::{OptionExt, ResultExt};
use scraper::Html;
use tracing::instrument;

/// An AO3 work (or chapter) page.
#[derive(Debug)]
pub struct WorkPage {
    document: Html,
    url: Option<String>,
    restricted: bool,
}
impl WorkPage {
    pub fn from_document(document: Html) -> Self {
        Self {
            document,
            url: None,
            restricted: false,
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// The URL the page was finally served from, after redirects. Chapter
    /// links redirect to `/works/<id>/chapters/<id>`, which is how the
    /// owning work is identified.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Marks the page as only reachable with a logged-in session.
    pub fn with_restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    /// Whether the document looks like a work page at all (login walls and
    /// error pages don't).
    pub fn is_valid(&self) -> bool {
        self.document.select(&consts::WORK_META_SELECTOR).next().is_some()
    }

    /// Work ID, taken from the final URL and falling back to the kudos form.
    pub fn work_id(&self) -> Result<u64> {
        if let Some(url) = &self.url
            && let Some(id) = consts::WORK_PATH_REGEX.captures(url).and_then(|captures| captures.get(1))
        {
            return id.as_str().parse::<u64>().or_raise(|| ErrorKind::ParseError {
                field: "work_id",
                value: id.as_str().to_string(),
            });
        }
        let value = self
            .document
            .select(&consts::KUDOS_COMMENTABLE_SELECTOR)
            .find_map(|input| input.value().attr("value"))
            .ok_or_raise(|| ErrorKind::MissingField("work_id"))?;
        value.trim().parse::<u64>().or_raise(|| ErrorKind::ParseError {
            field: "work_id",
            value: value.to_string(),
        })
    }

    /// Extracts the work.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document is not an AO3 work page ([`ErrorKind::InvalidDocument`])
    /// - Required fields (ID, title, dates, chapters) cannot be found or parsed
    #[instrument(skip(self), fields(url = self.url.as_deref()))]
    pub fn work(&self) -> Result<Work> {
        let meta = self
            .document
            .select(&consts::WORK_META_SELECTOR)
            .next()
            .ok_or_raise(|| ErrorKind::InvalidDocument)?;
        let work_id = self.work_id()?;
        let datalist = Datalist::new(meta);
        let published = datalist.date("published", &["Published"])?;
        let updated = datalist
            .date("updated", &["Updated", "Completed"])?
            .or(published)
            .ok_or_raise(|| ErrorKind::MissingField("updated"))?;
        Ok(Work {
            key: UniqueKey::work(Site::Ao3, work_id.to_string()),
            url: work_url(work_id),
            // Main Document
            title: self.title()?,
            authors: self.authors(),
            summary: self.summary(),
            restricted: self.restricted || self.document.select(&consts::RESTRICTED_SELECTOR).next().is_some(),
            // Datalist
            language: datalist.language(),
            rating: datalist.rating()?,
            warnings: datalist.warnings(),
            categories: datalist.categories(),
            fandoms: datalist.fandoms(),
            tags: datalist.tags(),
            series: datalist.series(),
            // Datalist -> Stats
            words: datalist.count(&["Words"]).unwrap_or(0),
            chapters: datalist.chapters()?.ok_or_raise(|| ErrorKind::MissingField("chapters"))?,
            kudos: datalist.count(&["Kudos"]).unwrap_or(0),
            comments: datalist.count(&["Comments"]).unwrap_or(0),
            hits: Some(datalist.count(&["Hits"]).unwrap_or(0)),
            bookmarks: Some(datalist.count(&["Bookmarks"]).unwrap_or(0)),
            updated,
            published,
        })
    }

    fn title(&self) -> Result<String> {
        self.document
            .select(&consts::TITLE_SELECTOR)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty())
            .ok_or_raise(|| ErrorKind::MissingField("title"))
    }

    /// Linked authors in byline order; bylines without links (`Anonymous`)
    /// become a single author named after the byline text.
    fn authors(&self) -> Vec<Author> {
        let Some(byline) = self.document.select(&consts::BYLINE_SELECTOR).next() else {
            return Vec::new();
        };
        let authors = authors_in(byline);
        if !authors.is_empty() {
            return authors;
        }
        let text = element_text(byline);
        if text.is_empty() { Vec::new() } else { vec![Author::from(text)] }
    }

    fn summary(&self) -> String {
        self.document.select(&consts::SUMMARY_SELECTOR).next().map(format_element).unwrap_or_default()
    }
}
impl From<Html> for WorkPage {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}
