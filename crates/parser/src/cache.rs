use crate::entity::Entity;
use crate::render::render;
use abstractor_extract::models::UniqueKey;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// A cached entity and its summary, rendered at most once.
#[derive(Debug)]
pub struct ParsedEntry {
    pub key: UniqueKey,
    pub entity: Entity,
    rendered: OnceLock<String>,
}
impl ParsedEntry {
    fn new(key: UniqueKey, entity: Entity) -> Self {
        Self {
            key,
            entity,
            rendered: OnceLock::new(),
        }
    }

    pub fn summary(&self) -> &str {
        self.rendered.get_or_init(|| render(&self.entity))
    }
}

/// Per-message store of parsed entities, in insertion order.
///
/// An entity can be reachable under more than one key (a chapter link and
/// the work it belongs to); it is still listed, and summarized, once.
#[derive(Debug, Default)]
pub struct ParsedCache {
    entries: Vec<ParsedEntry>,
    index: HashMap<UniqueKey, usize>,
}
impl ParsedCache {
    pub fn get(&self, key: &UniqueKey) -> Option<&Entity> {
        self.index.get(key).map(|&i| &self.entries[i].entity)
    }

    pub fn contains(&self, key: &UniqueKey) -> bool {
        self.index.contains_key(key)
    }

    /// Stores `entity` under `key` and returns the cached handle. A key that
    /// is already present keeps its original entity.
    pub fn insert(&mut self, key: UniqueKey, entity: Entity) -> Entity {
        if let Some(existing) = self.get(&key) {
            debug!(%key, "already cached");
            return existing.clone();
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(ParsedEntry::new(key, entity.clone()));
        entity
    }

    /// Makes the entry stored under `target` reachable under `alias` as well.
    /// Returns `false` when `target` isn't cached.
    pub fn alias(&mut self, alias: UniqueKey, target: &UniqueKey) -> bool {
        let Some(&index) = self.index.get(target) else {
            return false;
        };
        self.index.entry(alias).or_insert(index);
        true
    }

    /// Number of distinct entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ParsedEntry> {
        self.entries.iter()
    }

    /// Summaries of the first `limit` entities.
    pub fn summaries(&self, limit: usize) -> Vec<String> {
        self.entries.iter().take(limit).map(|entry| entry.summary().to_string()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::work;
    use abstractor_extract::models::{EntityKind, Site};

    #[test]
    fn insertion_order_and_dedup() {
        let mut cache = ParsedCache::default();
        let first = cache.insert(UniqueKey::work(Site::Ao3, "1"), work(Site::Ao3, "1", "One").into());
        cache.insert(UniqueKey::work(Site::Ao3, "2"), work(Site::Ao3, "2", "Two").into());
        let again = cache.insert(UniqueKey::work(Site::Ao3, "1"), work(Site::Ao3, "1", "Other").into());
        assert!(first.same_instance(&again));
        assert_eq!(cache.len(), 2);
        let keys: Vec<_> = cache.entries().map(|entry| entry.key.to_string()).collect();
        assert_eq!(keys, vec!["ao3:work:1", "ao3:work:2"]);
    }

    #[test]
    fn aliases_share_an_entry() {
        let mut cache = ParsedCache::default();
        let work_key = UniqueKey::work(Site::Ao3, "1");
        let chapter_key = UniqueKey::new(Site::Ao3, EntityKind::Chapter, "77");
        cache.insert(work_key.clone(), work(Site::Ao3, "1", "One").into());
        assert!(cache.alias(chapter_key.clone(), &work_key));
        assert!(!cache.alias(UniqueKey::new(Site::Ao3, EntityKind::Chapter, "78"), &UniqueKey::work(Site::Ao3, "9")));
        assert_eq!(cache.len(), 1);
        let via_alias = cache.get(&chapter_key).unwrap();
        assert!(via_alias.same_instance(cache.get(&work_key).unwrap()));
    }

    #[test]
    fn summaries_are_limited_and_rendered_once() {
        let mut cache = ParsedCache::default();
        for id in ["1", "2", "3"] {
            cache.insert(UniqueKey::work(Site::Ao3, id), work(Site::Ao3, id, "Title").into());
        }
        assert_eq!(cache.summaries(2).len(), 2);
        assert_eq!(cache.summaries(10).len(), 3);
        assert!(cache.summaries(0).is_empty());
        let entry = cache.entries().next().unwrap();
        assert!(std::ptr::eq(entry.summary(), entry.summary()));
        cache.clear();
        assert!(cache.is_empty());
    }
}
