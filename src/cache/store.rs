//! Process-lifetime in-memory entity cache.
//!
//! No eviction policy, no size bound, no TTL. Staleness is accepted as a
//! design tradeoff favoring simplicity and instant back-navigation;
//! entries live until the process exits and are refreshed by any later
//! successful fetch of the same id. Writes are last-write-wins.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use tracing::trace;

use super::traits::Cacheable;
use crate::catalog::types::{AnnotationItem, ContentItem};

/// Generic id-keyed map for one entity kind.
pub struct EntityMap<T: Cacheable> {
  inner: RwLock<HashMap<String, T>>,
}

impl<T: Cacheable> EntityMap<T> {
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(HashMap::new()),
    }
  }

  pub fn get(&self, id: &str) -> Option<T> {
    self
      .inner
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .get(id)
      .cloned()
  }

  pub fn put(&self, entity: T) {
    let key = entity.cache_key();
    trace!(entity_type = T::entity_type(), key = %key, "cache put");
    self
      .inner
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(key, entity);
  }

  pub fn put_all(&self, entities: impl IntoIterator<Item = T>) {
    let mut inner = self
      .inner
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    for entity in entities {
      inner.insert(entity.cache_key(), entity);
    }
  }
}

impl<T: Cacheable> Default for EntityMap<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// Shared cache for content items and their annotations, plus the
/// in-flight marker set used by the prefetch scheduler.
///
/// Construct one per process and share it behind an `Arc`; tests build
/// isolated instances instead of relying on ambient module state.
pub struct EntityCache {
  items: EntityMap<ContentItem>,
  annotations: RwLock<HashMap<String, Vec<AnnotationItem>>>,
  inflight: Mutex<HashSet<String>>,
}

impl EntityCache {
  pub fn new() -> Self {
    Self {
      items: EntityMap::new(),
      annotations: RwLock::new(HashMap::new()),
      inflight: Mutex::new(HashSet::new()),
    }
  }

  pub fn get(&self, id: &str) -> Option<ContentItem> {
    self.items.get(id)
  }

  pub fn put(&self, item: ContentItem) {
    self.items.put(item);
  }

  pub fn put_all(&self, items: impl IntoIterator<Item = ContentItem>) {
    self.items.put_all(items);
  }

  pub fn annotations(&self, subject_id: &str) -> Option<Vec<AnnotationItem>> {
    self
      .annotations
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .get(subject_id)
      .cloned()
  }

  pub fn put_annotations(&self, subject_id: &str, items: Vec<AnnotationItem>) {
    self
      .annotations
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(subject_id.to_string(), items);
  }

  /// Mark a prefetch for `id` as in flight. Returns false if one is
  /// already running, in which case the caller must not issue another.
  pub fn begin_prefetch(&self, id: &str) -> bool {
    self
      .inflight
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(id.to_string())
  }

  /// Whether a prefetch for `id` is currently in flight.
  pub fn prefetch_inflight(&self, id: &str) -> bool {
    self
      .inflight
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .contains(id)
  }

  /// Clear the in-flight marker for `id`, success or not.
  pub fn end_prefetch(&self, id: &str) {
    self
      .inflight
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .remove(id);
  }
}

impl Default for EntityCache {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::test_fixtures::{annotation, content_item};

  #[test]
  fn test_get_returns_absent_before_first_put() {
    let cache = EntityCache::new();
    assert!(cache.get("c-1").is_none());
    assert!(cache.annotations("c-1").is_none());
  }

  #[test]
  fn test_put_then_get_round_trips() {
    let cache = EntityCache::new();
    cache.put(content_item("c-1"));
    let cached = cache.get("c-1").expect("cached item");
    assert_eq!(cached.id, "c-1");
  }

  #[test]
  fn test_last_write_wins() {
    let cache = EntityCache::new();
    let mut first = content_item("c-1");
    first.display_name = "First".to_string();
    let mut second = content_item("c-1");
    second.display_name = "Second".to_string();

    cache.put(first);
    cache.put(second);

    assert_eq!(cache.get("c-1").expect("item").display_name, "Second");
  }

  #[test]
  fn test_annotations_keyed_by_subject() {
    let cache = EntityCache::new();
    cache.put_annotations("c-1", vec![annotation("a-1", "c-1")]);
    cache.put_annotations("c-2", vec![]);

    assert_eq!(cache.annotations("c-1").expect("entries").len(), 1);
    // An empty cached list is a hit, distinct from a miss
    assert_eq!(cache.annotations("c-2").expect("entries").len(), 0);
    assert!(cache.annotations("c-3").is_none());
  }

  #[test]
  fn test_inflight_marker_is_single_entry_per_id() {
    let cache = EntityCache::new();
    assert!(cache.begin_prefetch("c-1"));
    assert!(!cache.begin_prefetch("c-1"));
    cache.end_prefetch("c-1");
    assert!(cache.begin_prefetch("c-1"));
  }
}
