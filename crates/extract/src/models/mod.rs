mod author;
mod chapters;
mod fandom;
mod rating;
mod series;
mod site;
mod tag;
mod warning;
mod work;

pub use self::author::Author;
pub use self::chapters::Chapters;
pub use self::fandom::Fandom;
pub use self::rating::Rating;
pub use self::series::{Series, SeriesPosition, WorkRef};
pub use self::site::{EntityKind, Site, UniqueKey};
pub use self::tag::{Tag, TagKind};
pub use self::warning::Warning;
pub use self::work::Work;

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(['/', '-', '_', ' '], "")
}
