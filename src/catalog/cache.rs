//! Caching implementations for catalog types.

use crate::cache::Cacheable;

use super::types::ContentItem;

impl Cacheable for ContentItem {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "content_item"
  }
}
