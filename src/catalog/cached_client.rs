//! Cached catalog adapter that wraps a remote data source with the
//! shared entity cache and the bundled fallback dataset.
//!
//! Read paths degrade instead of failing: on a transient or shape error
//! the fallback dataset is consulted before anything is surfaced, and
//! "must show something" feeds (the homepage) never return an error at
//! all. Every remote hit primes the cache so back-navigation is free.

use std::sync::Arc;

use tracing::{debug, warn};

use super::client::DataSource;
use super::types::{AnnotationItem, ContentItem, User};
use crate::cache::{EntityCache, Sourced};
use crate::error::{FetchError, FetchResult};
use crate::fallback::FallbackDataset;

/// Catalog read surface with transparent caching and fallback.
#[derive(Clone)]
pub struct CachedCatalog {
  source: Arc<dyn DataSource>,
  cache: Arc<EntityCache>,
  fallback: Arc<FallbackDataset>,
}

impl CachedCatalog {
  pub fn new(
    source: Arc<dyn DataSource>,
    cache: Arc<EntityCache>,
    fallback: Arc<FallbackDataset>,
  ) -> Self {
    Self {
      source,
      cache,
      fallback,
    }
  }

  /// Get a single content item by id.
  ///
  /// Cache first; on a miss the remote source is queried and the result
  /// primes the cache. Remote failures consult the fallback dataset;
  /// `NotFound` is returned only when the id is absent everywhere.
  pub async fn content_item(&self, id: &str) -> FetchResult<Sourced<ContentItem>> {
    if let Some(item) = self.cache.get(id) {
      return Ok(Sourced::from_cache(item));
    }

    match self.source.content_item_by_id(id).await {
      Ok(item) => {
        self.cache.put(item.clone());
        Ok(Sourced::from_remote(item))
      }
      Err(err) => {
        log_degraded("content item", &err);
        match self.fallback.content_by_id(id) {
          Some(item) => Ok(Sourced::from_fallback(item)),
          None if err == FetchError::NotFound => Err(FetchError::NotFound),
          None => Err(err),
        }
      }
    }
  }

  /// Get the annotations for a content item.
  ///
  /// An empty remote result is a valid answer here; only errors divert
  /// to the fallback dataset.
  pub async fn annotations(&self, subject_id: &str) -> Sourced<Vec<AnnotationItem>> {
    if let Some(items) = self.cache.annotations(subject_id) {
      return Sourced::from_cache(items);
    }

    match self.source.annotations_for(subject_id).await {
      Ok(items) => {
        self.cache.put_annotations(subject_id, items.clone());
        Sourced::from_remote(items)
      }
      Err(err) => {
        log_degraded("annotations", &err);
        Sourced::from_fallback(self.fallback.annotations_for(subject_id))
      }
    }
  }

  /// Homepage feed: featured items, then recently approved items when
  /// nothing is flagged featured, then the fallback snapshot. Never an
  /// error, never empty while the fallback has rows.
  pub async fn featured_content(&self, limit: usize) -> Sourced<Vec<ContentItem>> {
    match self.source.featured_content(limit).await {
      Ok(items) if !items.is_empty() => {
        self.cache.put_all(items.clone());
        Sourced::from_remote(items)
      }
      Ok(_) => match self.source.recent_content(limit).await {
        Ok(items) if !items.is_empty() => {
          self.cache.put_all(items.clone());
          Sourced::from_remote(items)
        }
        Ok(_) => {
          debug!("featured feed empty, serving fallback snapshot");
          Sourced::from_fallback(self.fallback.featured(limit))
        }
        Err(err) => {
          log_degraded("featured feed", &err);
          Sourced::from_fallback(self.fallback.featured(limit))
        }
      },
      Err(err) => {
        log_degraded("featured feed", &err);
        Sourced::from_fallback(self.fallback.featured(limit))
      }
    }
  }

  /// Homepage feed: most recent annotations across the catalog. Same
  /// must-show-something policy as [`featured_content`].
  ///
  /// [`featured_content`]: CachedCatalog::featured_content
  pub async fn recent_annotations(&self, limit: usize) -> Sourced<Vec<AnnotationItem>> {
    match self.source.recent_annotations(limit).await {
      Ok(items) if !items.is_empty() => Sourced::from_remote(items),
      Ok(_) => {
        debug!("recent annotations empty, serving fallback snapshot");
        Sourced::from_fallback(self.fallback.recent_annotations(limit))
      }
      Err(err) => {
        log_degraded("recent annotations", &err);
        Sourced::from_fallback(self.fallback.recent_annotations(limit))
      }
    }
  }

  /// Annotations authored by one user. An empty result is valid.
  pub async fn annotations_by_author(
    &self,
    author_id: &str,
    limit: usize,
  ) -> Sourced<Vec<AnnotationItem>> {
    match self.source.annotations_by_author(author_id, limit).await {
      Ok(items) => Sourced::from_remote(items),
      Err(err) => {
        log_degraded("author annotations", &err);
        Sourced::from_fallback(self.fallback.annotations_by_author(author_id, limit))
      }
    }
  }

  /// Get a user profile by id, with the same degradation as
  /// [`content_item`].
  ///
  /// [`content_item`]: CachedCatalog::content_item
  pub async fn user(&self, id: &str) -> FetchResult<Sourced<User>> {
    match self.source.user_by_id(id).await {
      Ok(user) => Ok(Sourced::from_remote(user)),
      Err(err) => {
        log_degraded("user profile", &err);
        match self.fallback.user_by_id(id) {
          Some(user) => Ok(Sourced::from_fallback(user)),
          None if err == FetchError::NotFound => Err(FetchError::NotFound),
          None => Err(err),
        }
      }
    }
  }
}

fn log_degraded(surface: &str, err: &FetchError) {
  match err {
    FetchError::ShapeMismatch(msg) => {
      warn!(surface, message = %msg, "remote returned unexpected shape, consulting fallback");
    }
    FetchError::Transient(msg) => {
      warn!(surface, message = %msg, "remote unavailable, consulting fallback");
    }
    FetchError::NotFound => {
      debug!(surface, "remote has no rows, consulting fallback");
    }
  }
}
