//! Image reference handling.
//!
//! Backend rows carry image references as loose strings: a full URL, a
//! path inside the public storage bucket, a legacy asset key, or nothing
//! at all. The shape is decided once, at the ingestion boundary, by
//! [`ImageRef::classify`]; rendering code only ever sees the tagged
//! variants and a total resolver that cannot fail.

mod resolver;
mod storage;

pub use resolver::ImageResolver;
pub use storage::{PublicBucketStorage, StorageProvider};

use serde::{Deserialize, Serialize};
use url::Url;

/// Bundled placeholder shown whenever no usable image can be resolved.
pub const DEFAULT_PLACEHOLDER: &str = "assets/images/default_strain.jpg";

/// Closed table of legacy asset keys from the pre-storage era.
/// Not extensible at runtime.
const LEGACY_ASSETS: &[(&str, &str)] = &[
  ("s1", "assets/images/strains/s1/blue_dream_1.jpg"),
  ("s2", "assets/images/strains/s2/og_kush_1.jpg"),
  ("s3", "assets/images/strains/s3/sour_diesel_1.jpg"),
];

/// Look up a legacy asset key. Returns the bundled asset path.
pub fn legacy_asset(key: &str) -> Option<&'static str> {
  LEGACY_ASSETS
    .iter()
    .find(|(k, _)| *k == key)
    .map(|(_, path)| *path)
}

/// A classified image reference.
///
/// Serialized transparently as the loose string it came from, so domain
/// types round-trip through the wire format unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ImageRef {
  /// No reference present.
  Absent,
  /// A full URL, returned verbatim at render time.
  Absolute(String),
  /// A key into the bundled legacy asset table.
  LegacyKey(String),
  /// A path relative to the public storage bucket root.
  BucketRelative(String),
}

impl ImageRef {
  /// Classify a raw reference value. First match wins: absent, full
  /// URL, legacy key, then bucket-relative path.
  pub fn classify(raw: Option<&str>) -> Self {
    let Some(raw) = raw else {
      return ImageRef::Absent;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return ImageRef::Absent;
    }
    if Url::parse(trimmed).is_ok() {
      return ImageRef::Absolute(trimmed.to_string());
    }
    if legacy_asset(trimmed).is_some() {
      return ImageRef::LegacyKey(trimmed.to_string());
    }
    ImageRef::BucketRelative(trimmed.trim_start_matches('/').to_string())
  }

  pub fn is_absent(&self) -> bool {
    matches!(self, ImageRef::Absent)
  }
}

impl From<Option<String>> for ImageRef {
  fn from(raw: Option<String>) -> Self {
    ImageRef::classify(raw.as_deref())
  }
}

impl From<ImageRef> for Option<String> {
  fn from(reference: ImageRef) -> Self {
    match reference {
      ImageRef::Absent => None,
      ImageRef::Absolute(url) => Some(url),
      ImageRef::LegacyKey(key) => Some(key),
      ImageRef::BucketRelative(path) => Some(path),
    }
  }
}

/// A concrete, renderable image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
  /// Fetch from a URL.
  Remote(String),
  /// Load from an asset bundled with the app.
  Bundled(&'static str),
}
