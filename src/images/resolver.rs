//! Layered resolution from an [`ImageRef`] to a renderable source.
//!
//! Two variants are exposed: a synchronous one for render-time calls,
//! which never performs I/O and always terminates immediately, and an
//! async one that may consult the storage collaborator for
//! bucket-relative paths. Both are total: they never fail and never
//! return an empty source.

use std::sync::Arc;

use tracing::debug;

use super::storage::StorageProvider;
use super::{legacy_asset, ImageRef, ImageSource, DEFAULT_PLACEHOLDER};

/// Resolves image references against a configured storage bucket.
pub struct ImageResolver {
  storage: Arc<dyn StorageProvider>,
  bucket: String,
}

impl ImageResolver {
  pub fn new(storage: Arc<dyn StorageProvider>, bucket: impl Into<String>) -> Self {
    Self {
      storage,
      bucket: bucket.into(),
    }
  }

  /// Resolve without I/O. Returns `None` only for bucket-relative
  /// references, which need the async variant.
  pub fn resolve_local(reference: &ImageRef) -> Option<ImageSource> {
    match reference {
      ImageRef::Absent => Some(ImageSource::Bundled(DEFAULT_PLACEHOLDER)),
      ImageRef::Absolute(url) => Some(ImageSource::Remote(url.clone())),
      ImageRef::LegacyKey(key) => Some(ImageSource::Bundled(
        legacy_asset(key).unwrap_or(DEFAULT_PLACEHOLDER),
      )),
      ImageRef::BucketRelative(_) => None,
    }
  }

  /// Resolve a reference, consulting the storage collaborator for
  /// bucket-relative paths. Degrades to the placeholder on any failure.
  pub async fn resolve(&self, reference: &ImageRef) -> ImageSource {
    if let Some(source) = Self::resolve_local(reference) {
      return source;
    }

    let ImageRef::BucketRelative(path) = reference else {
      return ImageSource::Bundled(DEFAULT_PLACEHOLDER);
    };

    match self.storage.resolve_public_url(&self.bucket, path).await {
      Ok(url) if !url.trim().is_empty() => ImageSource::Remote(url),
      Ok(_) => ImageSource::Bundled(DEFAULT_PLACEHOLDER),
      Err(err) => {
        debug!(path = %path, error = %err, "storage URL resolution failed, using placeholder");
        ImageSource::Bundled(DEFAULT_PLACEHOLDER)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;

  use super::*;
  use crate::error::{FetchError, FetchResult};

  struct FixedStorage {
    fail: bool,
  }

  #[async_trait]
  impl StorageProvider for FixedStorage {
    async fn resolve_public_url(&self, bucket: &str, path: &str) -> FetchResult<String> {
      if self.fail {
        Err(FetchError::transient("storage unreachable"))
      } else {
        Ok(format!("https://storage.test/{}/{}", bucket, path))
      }
    }

    async fn list_objects(&self, _bucket: &str, _prefix: &str) -> FetchResult<Vec<String>> {
      Ok(Vec::new())
    }
  }

  fn resolver(fail: bool) -> ImageResolver {
    ImageResolver::new(Arc::new(FixedStorage { fail }), "assets")
  }

  #[test]
  fn test_local_absent_returns_placeholder() {
    assert_eq!(
      ImageResolver::resolve_local(&ImageRef::Absent),
      Some(ImageSource::Bundled(DEFAULT_PLACEHOLDER))
    );
  }

  #[test]
  fn test_local_absolute_url_verbatim() {
    let reference = ImageRef::Absolute("https://x/y.png".to_string());
    assert_eq!(
      ImageResolver::resolve_local(&reference),
      Some(ImageSource::Remote("https://x/y.png".to_string()))
    );
  }

  #[test]
  fn test_local_legacy_key_maps_to_bundled_asset() {
    let reference = ImageRef::LegacyKey("s2".to_string());
    assert_eq!(
      ImageResolver::resolve_local(&reference),
      Some(ImageSource::Bundled("assets/images/strains/s2/og_kush_1.jpg"))
    );
  }

  #[test]
  fn test_local_bucket_path_needs_async() {
    let reference = ImageRef::BucketRelative("images/foo.png".to_string());
    assert_eq!(ImageResolver::resolve_local(&reference), None);
  }

  #[tokio::test]
  async fn test_async_bucket_path_uses_storage() {
    let reference = ImageRef::BucketRelative("images/foo.png".to_string());
    let source = resolver(false).resolve(&reference).await;
    assert_eq!(
      source,
      ImageSource::Remote("https://storage.test/assets/images/foo.png".to_string())
    );
  }

  #[tokio::test]
  async fn test_async_storage_failure_falls_back_to_placeholder() {
    let reference = ImageRef::BucketRelative("images/foo.png".to_string());
    let source = resolver(true).resolve(&reference).await;
    assert_eq!(source, ImageSource::Bundled(DEFAULT_PLACEHOLDER));
  }

  #[tokio::test]
  async fn test_async_fast_paths_skip_storage() {
    // A failing storage provider must not affect non-bucket references
    let source = resolver(true).resolve(&ImageRef::Absent).await;
    assert_eq!(source, ImageSource::Bundled(DEFAULT_PLACEHOLDER));

    let source = resolver(true)
      .resolve(&ImageRef::Absolute("https://x/y.png".to_string()))
      .await;
    assert_eq!(source, ImageSource::Remote("https://x/y.png".to_string()));
  }
}
