//! FicHub metadata responses, used for FanFiction.Net and SpaceBattles.

use crate::error::{ErrorKind, Result};
use crate::format::format_html;
use crate::models::{Author, Chapters, Fandom, Rating, Site, Tag, TagKind, UniqueKey, Work};
use crate::stats;
use exn::{OptionExt, ResultExt};
use serde::Deserialize;
use tracing::instrument;

/// FanFiction.Net genres; a work's genre field is one or two of these
/// joined by `/`.
const FFN_GENRES: &[&str] = &[
    "Adventure",
    "Angst",
    "Crime",
    "Drama",
    "Family",
    "Fantasy",
    "Friendship",
    "General",
    "Horror",
    "Humor",
    "Hurt/Comfort",
    "Mystery",
    "Parody",
    "Poetry",
    "Romance",
    "Sci-Fi",
    "Spiritual",
    "Supernatural",
    "Suspense",
    "Tragedy",
    "Western",
];

#[derive(Debug, Clone, Deserialize)]
pub struct FicHubResponse {
    #[serde(default)]
    pub meta: Option<FicHubMeta>,
    /// Non-zero when FicHub could not handle the query.
    #[serde(default)]
    pub err: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}
impl FicHubResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).or_raise(|| ErrorKind::InvalidDocument)
    }

    pub fn into_meta(self) -> Result<FicHubMeta> {
        if let Some(code) = self.err.filter(|code| *code != 0) {
            exn::bail!(ErrorKind::ParseError {
                field: "meta",
                value: format!("fichub error {code}: {}", self.msg.unwrap_or_default()),
            });
        }
        self.meta.ok_or_raise(|| ErrorKind::InvalidDocument)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FicHubMeta {
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// HTML.
    #[serde(default)]
    pub description: String,
    /// `complete` or `ongoing`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub chapters: u32,
    #[serde(default)]
    pub words: u64,
    /// ISO 8601 datetime.
    pub updated: String,
    #[serde(default)]
    pub created: Option<String>,
    /// Site-specific `" - "` separated details (FanFiction.Net only).
    #[serde(rename = "extraMeta", default)]
    pub extra_meta: Option<String>,
}
impl FicHubMeta {
    pub fn is_complete(&self) -> bool {
        self.status.eq_ignore_ascii_case("complete")
    }

    /// Normalizes the metadata into a [`Work`] for the site named by `key`.
    #[instrument(skip(self), fields(title = %self.title))]
    pub fn into_work(self, key: UniqueKey, url: impl Into<String> + std::fmt::Debug) -> Result<Work> {
        let updated = stats::date("updated", &self.updated)?;
        let published = self.created.as_deref().map(|created| stats::date("published", created)).transpose()?;
        let chapters = Chapters::new(self.chapters, self.is_complete().then_some(self.chapters));
        let extra = match (key.site, self.extra_meta.as_deref()) {
            (Site::FanFictionNet, Some(text)) => ExtraMeta::parse(text),
            _ => ExtraMeta::default(),
        };
        let is_ffn = key.site == Site::FanFictionNet;
        let mut tags: Vec<Tag> =
            extra.relationships.into_iter().map(|name| Tag::new(name, TagKind::Relationship)).collect();
        tags.extend(extra.characters.into_iter().map(|name| Tag::new(name, TagKind::Character)));
        let author = self.author.trim();
        Ok(Work {
            key,
            url: url.into(),
            title: self.title.trim().to_string(),
            authors: if author.is_empty() { Vec::new() } else { vec![Author::from(author)] },
            language: extra.language,
            rating: extra.rating,
            warnings: Vec::new(),
            categories: extra.genres,
            fandoms: extra.fandoms.into_iter().map(Fandom::from).collect(),
            tags,
            summary: format_html(&self.description),
            words: self.words,
            chapters,
            kudos: extra.favs,
            comments: extra.reviews,
            hits: None,
            bookmarks: is_ffn.then_some(extra.follows),
            updated,
            published,
            restricted: false,
            series: Vec::new(),
        })
    }
}

/// The FanFiction.Net details FicHub packs into `extraMeta`, e.g.
/// `Rated: Fiction T - English - Adventure/Humor - [Harry P., Ginny W.] Ron W. - Reviews: 1,024 - Favs: 3,000 - Follows: 2,500`.
///
/// Fields before the rating name the fandom(s) of crossovers. Unlabelled
/// fields after it are, in order of preference: genres (if every part is a
/// known genre), the language, then the characters. Unknown labelled fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraMeta {
    pub fandoms: Vec<String>,
    pub rating: Option<Rating>,
    pub language: Option<String>,
    pub genres: Vec<String>,
    pub characters: Vec<String>,
    /// Bracketed character groups, joined with `/`.
    pub relationships: Vec<String>,
    pub reviews: u64,
    pub favs: u64,
    pub follows: u64,
}
impl ExtraMeta {
    pub fn parse(text: &str) -> Self {
        let mut meta = Self::default();
        let mut rated = !text.contains("Rated:");
        for field in text.split(" - ").map(str::trim).filter(|field| !field.is_empty()) {
            if let Some((label, value)) = field.split_once(':')
                && is_label(label)
            {
                let value = value.trim();
                match label.trim() {
                    "Rated" => {
                        meta.rating = value.parse().ok();
                        rated = true;
                    },
                    "Language" => meta.language = Some(value.to_string()),
                    "Genre" => meta.genres = parse_genres(value).unwrap_or_default(),
                    "Characters" => meta.add_characters(value),
                    "Reviews" => meta.reviews = stats::count(value),
                    "Favs" => meta.favs = stats::count(value),
                    "Follows" => meta.follows = stats::count(value),
                    _ => {},
                }
                continue;
            }
            if !rated {
                if field != "Crossover" {
                    meta.fandoms.extend(field.split(" & ").map(|fandom| fandom.trim().to_string()));
                }
                continue;
            }
            if meta.genres.is_empty()
                && let Some(genres) = parse_genres(field)
            {
                meta.genres = genres;
            } else if meta.language.is_none() {
                meta.language = Some(field.to_string());
            } else if meta.characters.is_empty() {
                meta.add_characters(field);
            }
        }
        meta
    }

    fn add_characters(&mut self, field: &str) {
        let mut loose = String::new();
        let mut rest = field;
        while let Some(start) = rest.find('[') {
            loose.push_str(&rest[..start]);
            loose.push(',');
            let group = &rest[start + 1..];
            let (group, tail) = group.split_once(']').unwrap_or((group, ""));
            let members = split_names(group);
            if members.len() > 1 {
                self.relationships.push(members.join("/"));
            }
            for member in members {
                if !self.characters.contains(&member) {
                    self.characters.push(member);
                }
            }
            rest = tail;
        }
        loose.push_str(rest);
        for name in split_names(&loose) {
            if !self.characters.contains(&name) {
                self.characters.push(name);
            }
        }
    }
}

fn is_label(label: &str) -> bool {
    !label.is_empty() && label.len() <= 20 && label.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

fn split_names(text: &str) -> Vec<String> {
    text.split(',').map(str::trim).filter(|name| !name.is_empty()).map(String::from).collect()
}

fn parse_genres(field: &str) -> Option<Vec<String>> {
    let mut genres = Vec::new();
    let mut parts = field.split('/').map(str::trim).peekable();
    while let Some(part) = parts.next() {
        let genre = if part == "Hurt" && parts.peek() == Some(&"Comfort") {
            parts.next();
            "Hurt/Comfort"
        } else {
            part
        };
        if !FFN_GENRES.contains(&genre) {
            return None;
        }
        genres.push(genre.to_string());
    }
    (!genres.is_empty()).then_some(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    const FFN: &str = include_str!("../fixtures/fichub_ffn.json");
    const SB: &str = include_str!("../fixtures/fichub_sb.json");

    #[test]
    fn ffn_work() {
        let meta = FicHubResponse::from_json(FFN).unwrap().into_meta().unwrap();
        let work = meta
            .into_work(UniqueKey::work(Site::FanFictionNet, "5782108"), "https://www.fanfiction.net/s/5782108")
            .unwrap();
        assert_eq!(work.key.to_string(), "ffn:work:5782108");
        assert_eq!(work.title, "Harry Potter and the Methods of Rationality");
        assert_eq!(work.authors, vec![Author::from("Less Wrong")]);
        assert_eq!(work.rating, Some(Rating::TeenAndUp));
        assert_eq!(work.language.as_deref(), Some("English"));
        assert_eq!(work.categories, vec!["Drama", "Humor"]);
        assert_eq!(work.characters().collect::<Vec<_>>(), vec!["Harry P.", "Hermione G."]);
        assert_eq!(work.chapters, Chapters::new(122, Some(122)));
        assert_eq!(work.words, 661619);
        assert_eq!(work.kudos, 21_000);
        assert_eq!(work.comments, 36_000);
        assert_eq!(work.bookmarks, Some(16_000));
        assert_eq!(work.hits, None);
        assert_eq!(work.updated, date!(2015 - 03 - 14));
        assert_eq!(work.published, Some(date!(2010 - 02 - 28)));
        assert_eq!(work.summary, "Petunia married a biochemist, and Harry grew up reading science and science fiction.");
    }

    #[test]
    fn sb_work_ignores_extra_meta() {
        let meta = FicHubResponse::from_json(SB).unwrap().into_meta().unwrap();
        assert!(!meta.is_complete());
        let work = meta
            .into_work(
                UniqueKey::work(Site::SpaceBattles, "987654"),
                "https://forums.spacebattles.com/threads/a-quest.987654/",
            )
            .unwrap();
        assert_eq!(work.chapters, Chapters::new(45, None));
        assert_eq!(work.kudos, 0);
        assert_eq!(work.bookmarks, None);
        assert!(work.categories.is_empty());
        assert!(work.tags.is_empty());
    }

    #[test]
    fn error_response() {
        let response = FicHubResponse::from_json(r#"{"err": -1, "msg": "unable to find story"}"#).unwrap();
        let err = response.into_meta().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "meta", .. }));
    }

    #[rstest]
    #[case("")]
    #[case("<html>Bad Gateway</html>")]
    #[case("{}")]
    fn invalid_documents(#[case] body: &str) {
        let err = FicHubResponse::from_json(body).and_then(FicHubResponse::into_meta).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidDocument));
    }

    #[test]
    fn full_extra_meta() {
        let meta = ExtraMeta::parse(
            "Rated: Fiction K+ - Spanish - Hurt/Comfort/Romance - [Harry P., Ginny W.] Ron W., Luna L. - \
             Chapters: 3 - Words: 10,000 - Reviews: 1,024 - Favs: 3,000 - Follows: 2,500 - Updated: 1/2/2020 - id: 1",
        );
        assert_eq!(meta.rating, Some(Rating::KidsPlus));
        assert_eq!(meta.language.as_deref(), Some("Spanish"));
        assert_eq!(meta.genres, vec!["Hurt/Comfort", "Romance"]);
        assert_eq!(meta.relationships, vec!["Harry P./Ginny W."]);
        assert_eq!(meta.characters, vec!["Harry P.", "Ginny W.", "Ron W.", "Luna L."]);
        assert_eq!((meta.reviews, meta.favs, meta.follows), (1024, 3000, 2500));
    }

    #[test]
    fn crossover_fandoms() {
        let meta = ExtraMeta::parse("Crossover - Harry Potter & Naruto - Rated: Fiction M - English - Naruto U.");
        assert_eq!(meta.fandoms, vec!["Harry Potter", "Naruto"]);
        assert_eq!(meta.rating, Some(Rating::Mature));
        assert!(meta.genres.is_empty());
        assert_eq!(meta.characters, vec!["Naruto U."]);
    }

    #[test]
    fn labelled_fields() {
        let meta = ExtraMeta::parse("Rated: Fiction T - Genre: Adventure - Characters: Harry P. - Favs: 12");
        assert_eq!(meta.genres, vec!["Adventure"]);
        assert_eq!(meta.characters, vec!["Harry P."]);
        assert_eq!(meta.favs, 12);
        assert_eq!(meta.language, None);
    }

    #[rstest]
    #[case("Adventure", Some(vec!["Adventure"]))]
    #[case("Sci-Fi/Western", Some(vec!["Sci-Fi", "Western"]))]
    #[case("Hurt/Comfort", Some(vec!["Hurt/Comfort"]))]
    #[case("English", None)]
    #[case("Adventure/English", None)]
    #[case("Hurt", None)]
    fn genres(#[case] field: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|genres| genres.into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(parse_genres(field), expected);
    }
}
