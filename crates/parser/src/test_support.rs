use abstractor_extract::models::{Author, Chapters, Series, Site, UniqueKey, Work};
use time::macros::date;

/// A minimal work with only identity and title filled in.
pub fn work(site: Site, id: &str, title: &str) -> Work {
    Work {
        key: UniqueKey::work(site, id),
        url: format!("https://archiveofourown.org/works/{id}"),
        title: title.to_string(),
        authors: vec![Author::from("writer")],
        language: None,
        rating: None,
        warnings: Vec::new(),
        categories: Vec::new(),
        fandoms: Vec::new(),
        tags: Vec::new(),
        summary: String::new(),
        words: 1000,
        chapters: Chapters::default(),
        kudos: 0,
        comments: 0,
        hits: None,
        bookmarks: None,
        updated: date!(2023 - 01 - 15),
        published: None,
        restricted: false,
        series: Vec::new(),
    }
}

pub fn series(id: u64, name: &str) -> Series {
    Series {
        id,
        name: name.to_string(),
        authors: vec![Author::from("writer")],
        description: String::new(),
        begun: date!(2020 - 06 - 01),
        updated: date!(2023 - 01 - 15),
        words: 123456,
        work_count: 0,
        complete: false,
        restricted: false,
        works: Vec::new(),
    }
}
