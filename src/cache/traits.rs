//! Core traits and types for the caching system.

/// Trait for entities that can be cached.
pub trait Cacheable: Clone + Send + Sync {
  /// Unique identifier for this entity (e.g., content item id)
  fn cache_key(&self) -> String;

  /// Entity type name, used in logging
  fn entity_type() -> &'static str;
}

/// Where a returned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  /// Served from the in-memory cache
  Cache,
  /// Fresh data from the remote source
  Remote,
  /// Substituted from the bundled fallback dataset
  Fallback,
}

/// A value together with the source that produced it.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
  pub data: T,
  pub origin: Origin,
}

impl<T> Sourced<T> {
  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      origin: Origin::Cache,
    }
  }

  pub fn from_remote(data: T) -> Self {
    Self {
      data,
      origin: Origin::Remote,
    }
  }

  pub fn from_fallback(data: T) -> Self {
    Self {
      data,
      origin: Origin::Fallback,
    }
  }
}
