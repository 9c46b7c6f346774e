//! Storage collaborator trait and the public-bucket implementation.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use url::Url;

use crate::error::{FetchError, FetchResult};

/// Remote object-storage operations the core consumes.
#[async_trait]
pub trait StorageProvider: Send + Sync {
  /// Resolve a bucket-relative path to a publicly reachable URL.
  async fn resolve_public_url(&self, bucket: &str, path: &str) -> FetchResult<String>;

  /// List object names under a prefix.
  async fn list_objects(&self, bucket: &str, prefix: &str) -> FetchResult<Vec<String>>;
}

/// Storage provider for a Supabase-style public bucket.
///
/// Public URLs are deterministic (`storage/v1/object/public/{bucket}/{path}`),
/// so resolution is pure URL construction; only listing needs the network.
pub struct PublicBucketStorage {
  http: reqwest::Client,
  base: Url,
  api_key: String,
}

impl PublicBucketStorage {
  pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
    let mut base =
      Url::parse(base_url).map_err(|e| eyre!("Invalid storage base URL {}: {}", base_url, e))?;
    // Url::join replaces the last path segment unless the base ends in '/'
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    Ok(Self {
      http: reqwest::Client::new(),
      base,
      api_key: api_key.into(),
    })
  }
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
  name: String,
}

#[async_trait]
impl StorageProvider for PublicBucketStorage {
  async fn resolve_public_url(&self, bucket: &str, path: &str) -> FetchResult<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
      return Err(FetchError::shape("empty object path"));
    }

    let url = self
      .base
      .join(&format!("storage/v1/object/public/{}/{}", bucket, trimmed))
      .map_err(|e| FetchError::shape(format!("unresolvable object path {}: {}", trimmed, e)))?;

    Ok(url.to_string())
  }

  async fn list_objects(&self, bucket: &str, prefix: &str) -> FetchResult<Vec<String>> {
    let endpoint = self
      .base
      .join(&format!("storage/v1/object/list/{}", bucket))
      .map_err(|e| FetchError::shape(format!("invalid bucket name {}: {}", bucket, e)))?;

    let response = self
      .http
      .post(endpoint)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .json(&serde_json::json!({ "prefix": prefix }))
      .send()
      .await
      .map_err(|e| FetchError::transient(e.to_string()))?;

    if !response.status().is_success() {
      return Err(FetchError::transient(format!(
        "storage list returned {}",
        response.status()
      )));
    }

    let entries: Vec<ObjectEntry> = response
      .json()
      .await
      .map_err(|e| FetchError::shape(e.to_string()))?;

    Ok(entries.into_iter().map(|entry| entry.name).collect())
  }
}
