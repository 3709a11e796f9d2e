use abstractor_extract::models::{EntityKind, Series, Site, UniqueKey, Work};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Output of a successful recognition: which site and entity a link points
/// at, independent of host spelling and path noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub site: Site,
    pub kind: EntityKind,
    pub id: String,
    /// The candidate text as it appeared in the message.
    pub raw: String,
    /// Normalized URL the entity is retrieved through.
    pub canonical: String,
}
impl LinkMatch {
    pub fn key(&self) -> UniqueKey {
        UniqueKey::new(self.site, self.kind, self.id.clone())
    }
}

/// A parsed work or series, shared between the cache and callers.
#[derive(Debug, Clone)]
pub enum Entity {
    Work(Arc<Work>),
    Series(Arc<SeriesEntity>),
}
impl Entity {
    pub fn site(&self) -> Site {
        match self {
            Self::Work(work) => work.site(),
            Self::Series(_) => Site::Ao3,
        }
    }

    /// `true` when both handles point at the same cached instance.
    pub fn same_instance(&self, other: &Entity) -> bool {
        match (self, other) {
            (Self::Work(a), Self::Work(b)) => Arc::ptr_eq(a, b),
            (Self::Series(a), Self::Series(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_work(&self) -> Option<&Arc<Work>> {
        match self {
            Self::Work(work) => Some(work),
            Self::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&Arc<SeriesEntity>> {
        match self {
            Self::Series(series) => Some(series),
            Self::Work(_) => None,
        }
    }
}
impl From<Work> for Entity {
    fn from(work: Work) -> Self {
        Self::Work(Arc::new(work))
    }
}
impl From<Series> for Entity {
    fn from(series: Series) -> Self {
        Self::Series(Arc::new(SeriesEntity::new(series)))
    }
}

/// A series plus the member works resolved so far, keyed by 1-indexed
/// position. Members are only fetched when asked for.
#[derive(Debug)]
pub struct SeriesEntity {
    pub series: Series,
    members: Mutex<HashMap<usize, Arc<Work>>>,
}
impl SeriesEntity {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            members: Mutex::default(),
        }
    }

    pub(crate) async fn cached_member(&self, position: usize) -> Option<Arc<Work>> {
        self.members.lock().await.get(&position).cloned()
    }

    /// Stores a resolved member; if one was stored concurrently, that one is
    /// kept and returned.
    pub(crate) async fn store_member(&self, position: usize, work: Arc<Work>) -> Arc<Work> {
        self.members.lock().await.entry(position).or_insert(work).clone()
    }
}
