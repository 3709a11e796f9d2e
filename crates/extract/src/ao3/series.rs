use super::{Datalist, authors_in, element_text};
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::format::format_element;
use crate::models::{Series, WorkRef};
use exn::{OptionExt, ResultExt};
use scraper::Html;
use std::collections::HashSet;
use tracing::instrument;

/// An AO3 series page.
///
/// Only the first page of member works is read; [`Series::work_count`]
/// still reports the series total.
#[derive(Debug)]
pub struct SeriesPage {
    id: u64,
    document: Html,
    restricted: bool,
}
impl SeriesPage {
    pub fn new(id: u64, html: &str) -> Self {
        Self {
            id,
            document: Html::parse_document(html),
            restricted: false,
        }
    }

    /// Marks the page as only reachable with a logged-in session.
    pub fn with_restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.document.select(&consts::SERIES_META_SELECTOR).next().is_some()
    }

    #[instrument(skip(self), fields(id = self.id))]
    pub fn series(&self) -> Result<Series> {
        let meta = self
            .document
            .select(&consts::SERIES_META_SELECTOR)
            .next()
            .ok_or_raise(|| ErrorKind::InvalidDocument)?;
        let datalist = Datalist::new(meta);
        let name = self
            .document
            .select(&consts::SERIES_TITLE_SELECTOR)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty())
            .ok_or_raise(|| ErrorKind::MissingField("name"))?;
        let begun = datalist
            .date("begun", &["Series Begun"])?
            .ok_or_raise(|| ErrorKind::MissingField("begun"))?;
        let updated = datalist.date("updated", &["Series Updated"])?.unwrap_or(begun);
        let works = self.works();
        let work_count = match datalist.count(&["Works"]) {
            Some(count) => u32::try_from(count).or_raise(|| ErrorKind::ParseError {
                field: "works",
                value: count.to_string(),
            })?,
            None => u32::try_from(works.len()).unwrap_or(u32::MAX),
        };
        Ok(Series {
            id: self.id,
            name,
            authors: datalist
                .element(&["Creator", "Creators", "Creator(s)"])
                .map(authors_in)
                .unwrap_or_default(),
            description: datalist.element(&["Description"]).map(format_element).unwrap_or_default(),
            begun,
            updated,
            words: datalist.count(&["Words"]).unwrap_or(0),
            work_count,
            complete: datalist.text(&["Complete"]).is_some_and(|text| text.eq_ignore_ascii_case("yes")),
            // A restricted marker anywhere (including on a member work) locks the series.
            restricted: self.restricted || self.document.select(&consts::RESTRICTED_SELECTOR).next().is_some(),
            works,
        })
    }

    /// Member works in listing order: the first work link in each blurb heading.
    fn works(&self) -> Vec<WorkRef> {
        let mut seen = HashSet::new();
        let mut works = Vec::new();
        for blurb in self.document.select(&consts::SERIES_BLURB_SELECTOR) {
            let Some(work) = blurb.select(&consts::BLURB_HEADING_LINK_SELECTOR).find_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let id = consts::WORK_PATH_REGEX.captures(href)?.get(1)?.as_str().parse::<u64>().ok()?;
                Some(WorkRef {
                    id,
                    title: element_text(anchor),
                })
            }) else {
                continue;
            };
            if seen.insert(work.id) {
                works.push(work);
            }
        }
        works
    }
}
