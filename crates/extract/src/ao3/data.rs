use super::element_text;
use crate::{consts, stats};
use crate::error::{ErrorKind, Result};
use crate::models::{Chapters, Fandom, Rating, SeriesPosition, Tag, TagKind, Warning};
use exn::ResultExt;
use scraper::ElementRef;
use std::collections::{HashMap, HashSet};
use time::Date;

/// Label-addressed view over an AO3 `<dl>` metadata block.
///
/// Nested lists (the work stats sit inside their own `<dl>`) are flattened,
/// so `Words` or `Kudos` can be looked up the same way as `Fandom`.
#[derive(Debug)]
pub struct Datalist<'a> {
    list: HashMap<String, ElementRef<'a>>,
}

/// Datalist Internals
impl<'a> Datalist<'a> {
    pub(crate) fn new(scope: ElementRef<'a>) -> Self {
        Self {
            list: Self::collect_labels(scope),
        }
    }

    /// Pairs every `<dt>` with the `<dd>` that directly follows it. A `<dt>`
    /// with no such sibling is ignored; the first occurrence of a label wins.
    fn collect_labels(scope: ElementRef<'a>) -> HashMap<String, ElementRef<'a>> {
        let mut list = HashMap::new();
        for dt in scope.select(&consts::DT_SELECTOR) {
            let Some(dd) = dt.next_siblings().find_map(ElementRef::wrap) else {
                continue;
            };
            if dd.value().name() != "dd" {
                continue;
            }
            let label = element_text(dt).trim_end_matches(':').trim().to_string();
            list.entry(label).or_insert(dd);
        }
        list
    }

    fn find_by_label(&self, labels: &[&str]) -> Option<ElementRef<'a>> {
        labels.iter().find_map(|label| self.list.get(*label).copied())
    }

    fn link_texts(&self, labels: &[&str]) -> Vec<String> {
        let Some(dd) = self.find_by_label(labels) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut texts = Vec::new();
        for anchor in dd.select(&consts::ANCHOR_SELECTOR) {
            let text = element_text(anchor);
            if !text.is_empty() && seen.insert(text.clone()) {
                texts.push(text);
            }
        }
        texts
    }
}

/// Datalist Public
impl<'a> Datalist<'a> {
    pub fn element(&self, labels: &[&str]) -> Option<ElementRef<'a>> {
        self.find_by_label(labels)
    }

    pub fn text(&self, labels: &[&str]) -> Option<String> {
        self.find_by_label(labels).map(element_text).filter(|text| !text.is_empty())
    }

    /// A display count such as `1,234`; `None` when the label is absent.
    pub fn count(&self, labels: &[&str]) -> Option<u64> {
        self.text(labels).map(|text| stats::count(&text))
    }

    pub fn date(&self, field: &'static str, labels: &[&str]) -> Result<Option<Date>> {
        self.text(labels).map(|text| stats::date(field, &text)).transpose()
    }

    pub fn chapters(&self) -> Result<Option<Chapters>> {
        self.text(&["Chapters"]).map(|text| stats::chapters(&text)).transpose()
    }

    pub fn fandoms(&self) -> Vec<Fandom> {
        self.link_texts(&["Fandom", "Fandoms"]).into_iter().map(Fandom::from).collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.link_texts(&["Category", "Categories"])
    }

    pub fn series(&self) -> Vec<SeriesPosition> {
        let Some(dd) = self.find_by_label(&["Series"]) else {
            return Vec::new();
        };
        let mut series = Vec::new();
        let mut seen_ids = HashSet::new();
        for span in dd.select(&consts::SERIES_POSITION_SELECTOR) {
            let Some((anchor, id)) = span.select(&consts::ANCHOR_SELECTOR).find_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let id = consts::SERIES_PATH_REGEX.captures(href)?.get(1)?.as_str().parse::<u64>().ok()?;
                Some((anchor, id))
            }) else {
                continue;
            };
            if !seen_ids.insert(id) {
                continue;
            }
            let position = consts::POSITION_REGEX
                .captures(&element_text(span))
                .and_then(|captures| captures.get(1))
                .map(|m| stats::count(m.as_str()))
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(1);
            series.push(SeriesPosition {
                id,
                name: element_text(anchor),
                position,
            });
        }
        series
    }

    pub fn rating(&self) -> Result<Option<Rating>> {
        Ok(if let Some(s) = self.text(&["Rating", "Ratings"]) {
            Some(s.parse::<Rating>().or_raise(|| ErrorKind::ParseError { field: "rating", value: s })?)
        } else {
            None
        })
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.link_texts(&["Warning", "Warnings", "Archive Warning", "Archive Warnings"])
            .into_iter()
            .filter_map(|text| text.as_str().parse().ok())
            .collect()
    }

    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = Vec::new();
        for name in self.link_texts(&["Relationship", "Relationships"]) {
            tags.push(Tag::new(name, TagKind::Relationship));
        }
        for name in self.link_texts(&["Character", "Characters"]) {
            tags.push(Tag::new(name, TagKind::Character));
        }
        for name in self.link_texts(&["Additional Tag", "Additional Tags"]) {
            tags.push(Tag::new(name, TagKind::Freeform));
        }
        tags
    }

    pub fn language(&self) -> Option<String> {
        self.text(&["Language"])
    }
}
