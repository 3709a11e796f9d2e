use super::Author;
use time::Date;

/// A work's position within a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesPosition {
    /// AO3 Series ID
    pub id: u64,
    /// Series name
    pub name: String,
    /// Position in series (1-indexed)
    pub position: u32,
}
impl SeriesPosition {
    pub fn url(&self) -> String {
        format!("https://archiveofourown.org/series/{}", self.id)
    }
}

/// A member of a series, as listed on the series page. Only enough to link
/// to it; the full [`Work`](super::Work) is fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkRef {
    pub id: u64,
    pub title: String,
}
impl WorkRef {
    pub fn url(&self) -> String {
        format!("https://archiveofourown.org/works/{}", self.id)
    }
}

/// An AO3 series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub id: u64,
    pub name: String,
    pub authors: Vec<Author>,
    /// Already run through the field formatter.
    pub description: String,
    pub begun: Date,
    pub updated: Date,
    pub words: u64,
    /// Number of works the series reports, which can be more than the
    /// number of entries in `works` (the series page is paginated).
    pub work_count: u32,
    pub complete: bool,
    pub restricted: bool,
    /// Member works, in series order.
    pub works: Vec<WorkRef>,
}
impl Series {
    pub fn url(&self) -> String {
        format!("https://archiveofourown.org/series/{}", self.id)
    }

    /// Looks up the reference for the 1-indexed `position`.
    pub fn member(&self, position: usize) -> Option<&WorkRef> {
        position.checked_sub(1).and_then(|index| self.works.get(index))
    }
}
