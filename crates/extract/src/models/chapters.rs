use std::fmt::{Display, Formatter, Result as FmtResult};

/// Chapter count information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chapters {
    /// Number of chapters currently posted
    pub written: u32,
    /// Expected total chapters (None if unknown/`?`)
    pub total: Option<u32>,
}
impl Chapters {
    /// A known total is never smaller than the number of chapters written;
    /// sites occasionally report e.g. `12/10` after an author adds chapters
    /// without bumping the total.
    pub fn new(written: u32, total: Option<u32>) -> Self {
        Self {
            written,
            total: total.map(|t| t.max(written)),
        }
    }
    /// Returns true if the work is complete (planned chapters have been written).
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|t| self.written >= t)
    }
}
impl Default for Chapters {
    fn default() -> Self {
        Self::new(1, None)
    }
}
impl From<(u32, u32)> for Chapters {
    fn from((written, total): (u32, u32)) -> Self {
        Chapters::new(written, Some(total))
    }
}
impl From<(u32, Option<u32>)> for Chapters {
    fn from((written, total): (u32, Option<u32>)) -> Self {
        Chapters::new(written, total)
    }
}
impl Display for Chapters {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.total {
            Some(total) => write!(f, "{}/{total}", self.written),
            None => write!(f, "{}/?", self.written),
        }
    }
}
