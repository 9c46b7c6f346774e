//! Best-effort cache warming ahead of navigation.
//!
//! List screens call [`PrefetchScheduler::schedule`] once per visible
//! row; by the time the user taps through, the detail screen usually
//! finds its data already cached. Prefetches never block the caller and
//! never surface errors.

use std::sync::Arc;

use tracing::debug;

use crate::cache::EntityCache;
use crate::catalog::DataSource;

/// Fire-and-forget prefetcher for content items and their annotations.
///
/// Must be used from within a tokio runtime; each prefetch runs as a
/// detached task whose only effect is a cache write.
#[derive(Clone)]
pub struct PrefetchScheduler {
  cache: Arc<EntityCache>,
  source: Arc<dyn DataSource>,
}

impl PrefetchScheduler {
  pub fn new(cache: Arc<EntityCache>, source: Arc<dyn DataSource>) -> Self {
    Self { cache, source }
  }

  /// Warm the cache for `id`.
  ///
  /// No-op when the item is already cached or a prefetch for the same
  /// id is still in flight, so repeated hints from list re-renders
  /// coalesce into a single remote fetch.
  pub fn schedule(&self, id: &str) {
    if self.cache.get(id).is_some() {
      return;
    }
    if !self.cache.begin_prefetch(id) {
      return;
    }

    let cache = Arc::clone(&self.cache);
    let source = Arc::clone(&self.source);
    let id = id.to_string();

    tokio::spawn(async move {
      let (item, annotations) = futures::future::join(
        source.content_item_by_id(&id),
        source.annotations_for(&id),
      )
      .await;

      match item {
        Ok(item) => cache.put(item),
        Err(err) => debug!(id = %id, error = %err, "prefetch discarded"),
      }
      match annotations {
        Ok(items) => cache.put_annotations(&id, items),
        Err(err) => debug!(id = %id, error = %err, "annotation prefetch discarded"),
      }

      cache.end_prefetch(&id);
    });
  }
}
