use super::{Author, Chapters, Fandom, Rating, SeriesPosition, Site, Tag, TagKind, UniqueKey, Warning};
use time::Date;

/// A single fic, normalized across sites.
///
/// Counts a site doesn't report are `0` (or `None` where the site has no
/// such concept at all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    /// Site-qualified identity; always of kind [`EntityKind::Work`](super::EntityKind::Work).
    pub key: UniqueKey,
    /// Canonical link to the work.
    pub url: String,
    pub title: String,
    /// Credited authors, in byline order (may be empty for anonymous works).
    pub authors: Vec<Author>,
    pub language: Option<String>,
    pub rating: Option<Rating>,
    pub warnings: Vec<Warning>,
    /// AO3 categories (`F/M`, `Gen`, ...) or FFN genres.
    pub categories: Vec<String>,
    pub fandoms: Vec<Fandom>,
    /// Relationship, character and freeform tags, each group in site order.
    pub tags: Vec<Tag>,
    /// Already run through the field formatter.
    pub summary: String,
    pub words: u64,
    pub chapters: Chapters,
    /// Kudos on AO3, favourites on FFN.
    pub kudos: u64,
    /// Comments on AO3, reviews on FFN.
    pub comments: u64,
    pub hits: Option<u64>,
    /// Bookmarks on AO3, follows on FFN.
    pub bookmarks: Option<u64>,
    pub updated: Date,
    pub published: Option<Date>,
    /// Only visible to logged-in users.
    pub restricted: bool,
    pub series: Vec<SeriesPosition>,
}
impl Work {
    pub fn site(&self) -> Site {
        self.key.site
    }

    fn tags_of(&self, kind: TagKind) -> impl Iterator<Item = &str> {
        self.tags.iter().filter(move |tag| tag.kind == kind).map(|tag| tag.name.as_str())
    }

    pub fn relationships(&self) -> impl Iterator<Item = &str> {
        self.tags_of(TagKind::Relationship)
    }

    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.tags_of(TagKind::Character)
    }

    pub fn freeform(&self) -> impl Iterator<Item = &str> {
        self.tags_of(TagKind::Freeform)
    }
}
