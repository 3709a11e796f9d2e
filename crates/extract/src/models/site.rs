use std::fmt::{Display, Formatter, Result as FmtResult};

/// A supported fiction-hosting site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Site {
    /// Archive of Our Own
    Ao3,
    /// FanFiction.Net
    FanFictionNet,
    /// SpaceBattles forums
    SpaceBattles,
}
impl Site {
    /// Short tag used in unique keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ao3 => "ao3",
            Self::FanFictionNet => "ffn",
            Self::SpaceBattles => "sb",
        }
    }

    /// Human-readable site name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ao3 => "Archive of Our Own",
            Self::FanFictionNet => "FanFiction.Net",
            Self::SpaceBattles => "SpaceBattles",
        }
    }

    /// Label for the line rendered next to the rating.
    pub fn category_label(&self) -> &'static str {
        match self {
            Self::Ao3 => "Category",
            Self::FanFictionNet | Self::SpaceBattles => "Genre",
        }
    }

    /// Label for the "liked it" counter, if the site has one.
    pub fn kudos_label(&self) -> Option<&'static str> {
        match self {
            Self::Ao3 => Some("Kudos"),
            Self::FanFictionNet => Some("Favs"),
            Self::SpaceBattles => None,
        }
    }

    /// Whether the site tags works with archive warnings.
    pub fn has_warnings(&self) -> bool {
        matches!(self, Self::Ao3)
    }
}
impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// What a link (and therefore a cache entry) points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Work,
    Series,
    /// A single chapter; resolves to its owning work once fetched.
    Chapter,
}
impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Series => "series",
            Self::Chapter => "chapter",
        }
    }
}
impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized identity of a fic, series or chapter on a site.
///
/// Two links that point at the same thing (mobile host, collection prefix,
/// trailing chapter or page segments) produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueKey {
    pub site: Site,
    pub kind: EntityKind,
    pub id: String,
}
impl UniqueKey {
    pub fn new(site: Site, kind: EntityKind, id: impl Into<String>) -> Self {
        Self { site, kind, id: id.into() }
    }

    pub fn work(site: Site, id: impl Into<String>) -> Self {
        Self::new(site, EntityKind::Work, id)
    }
}
impl Display for UniqueKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}:{}", self.site, self.kind, self.id)
    }
}
