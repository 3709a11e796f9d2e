//! Extraction of works and series from AO3 HTML pages.

mod data;
mod series;
mod work;

pub use self::data::Datalist;
pub use self::series::SeriesPage;
pub use self::work::WorkPage;
use crate::consts;
use crate::models::Author;
use scraper::ElementRef;

/// Canonical link for an AO3 work.
pub fn work_url(id: u64) -> String {
    format!("https://archiveofourown.org/works/{id}")
}

/// Canonical link for an AO3 series.
pub fn series_url(id: u64) -> String {
    format!("https://archiveofourown.org/series/{id}")
}

/// Builds an [`Author`] from a `/users/<name>/pseuds/<pseud>` link.
fn author_from_href(href: &str) -> Option<Author> {
    let captures = consts::AUTHOR_REGEX.captures(href)?;
    let username = captures.get(1)?.as_str();
    let pseudonym = captures.get(2).map(|m| m.as_str());
    Some(Author::new(username, pseudonym))
}

/// Collects authors from every matching anchor under `scope`, in document
/// order and without duplicates.
fn authors_in(scope: ElementRef<'_>) -> Vec<Author> {
    let mut authors: Vec<Author> = Vec::new();
    for anchor in scope.select(&consts::ANCHOR_SELECTOR) {
        if let Some(author) = anchor.value().attr("href").and_then(author_from_href)
            && !authors.contains(&author)
        {
            authors.push(author);
        }
    }
    authors
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
