//! Remote data source trait and the PostgREST-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use url::Url;

use super::api_types::{ApiAnnotationRow, ApiContentRow, ApiFavoriteRow, ApiUserRow};
use super::types::{AnnotationItem, ContentItem, FavoriteRelation, User};
use crate::config::Config;
use crate::error::{FetchError, FetchResult};

/// Abstract query interface over the remote structured-data service.
///
/// Four query shapes: select by id, select by foreign key, select top-N
/// by recency, and upsert/delete by key. Every failure is returned as a
/// typed [`FetchError`]; implementations never panic past this boundary
/// and perform no retries of their own.
#[async_trait]
pub trait DataSource: Send + Sync {
  async fn content_item_by_id(&self, id: &str) -> FetchResult<ContentItem>;

  async fn annotations_for(&self, subject_id: &str) -> FetchResult<Vec<AnnotationItem>>;

  async fn featured_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>>;

  async fn recent_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>>;

  async fn recent_annotations(&self, limit: usize) -> FetchResult<Vec<AnnotationItem>>;

  async fn annotations_by_author(
    &self,
    author_id: &str,
    limit: usize,
  ) -> FetchResult<Vec<AnnotationItem>>;

  async fn user_by_id(&self, id: &str) -> FetchResult<User>;

  async fn favorite_for(
    &self,
    owner_id: &str,
    subject_id: &str,
  ) -> FetchResult<Option<FavoriteRelation>>;

  async fn favorites_for_owner(&self, owner_id: &str) -> FetchResult<Vec<FavoriteRelation>>;

  async fn upsert_favorite(&self, relation: &FavoriteRelation) -> FetchResult<()>;

  async fn delete_favorite(&self, owner_id: &str, subject_id: &str) -> FetchResult<()>;
}

/// Timeout inherited by every request; surfaced as `Transient`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// PostgREST-style data source (the backend is a Supabase project).
pub struct RestDataSource {
  http: reqwest::Client,
  base: Url,
  api_key: String,
}

impl RestDataSource {
  pub fn new(config: &Config) -> Result<Self> {
    let mut base = Url::parse(&config.backend.url)
      .map_err(|e| eyre!("Invalid backend URL {}: {}", config.backend.url, e))?;
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    let http = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self {
      http,
      base,
      api_key: Config::api_key()?,
    })
  }

  fn table_url(&self, table: &str) -> FetchResult<Url> {
    self
      .base
      .join(&format!("rest/v1/{}", table))
      .map_err(|e| FetchError::shape(format!("invalid table {}: {}", table, e)))
  }

  /// Issue a filtered select and deserialize the row set.
  async fn select<T: DeserializeOwned>(
    &self,
    table: &str,
    filters: &[(&str, String)],
  ) -> FetchResult<Vec<T>> {
    let mut url = self.table_url(table)?;
    url
      .query_pairs_mut()
      .append_pair("select", "*")
      .extend_pairs(filters.iter().map(|(k, v)| (*k, v.as_str())));

    let response = self
      .http
      .get(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .send()
      .await
      .map_err(|e| FetchError::transient(e.to_string()))?;

    if !response.status().is_success() {
      return Err(FetchError::transient(format!(
        "{} select returned {}",
        table,
        response.status()
      )));
    }

    let body = response
      .bytes()
      .await
      .map_err(|e| FetchError::transient(e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| FetchError::shape(format!("{} rows: {}", table, e)))
  }
}

#[async_trait]
impl DataSource for RestDataSource {
  async fn content_item_by_id(&self, id: &str) -> FetchResult<ContentItem> {
    let mut rows: Vec<ApiContentRow> = self
      .select(
        "strains",
        &[("id", format!("eq.{}", id)), ("limit", "1".to_string())],
      )
      .await?;

    match rows.pop() {
      Some(row) => row.into_domain(),
      None => Err(FetchError::NotFound),
    }
  }

  async fn annotations_for(&self, subject_id: &str) -> FetchResult<Vec<AnnotationItem>> {
    let rows: Vec<ApiAnnotationRow> = self
      .select(
        "reviews",
        &[
          ("strain_id", format!("eq.{}", subject_id)),
          ("order", "created_at.desc".to_string()),
        ],
      )
      .await?;

    Ok(rows.into_iter().map(AnnotationItem::from).collect())
  }

  async fn featured_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>> {
    let rows: Vec<ApiContentRow> = self
      .select(
        "strains",
        &[
          ("is_featured", "eq.true".to_string()),
          ("approved", "eq.true".to_string()),
          ("order", "created_at.desc".to_string()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    rows.into_iter().map(ApiContentRow::into_domain).collect()
  }

  async fn recent_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>> {
    let rows: Vec<ApiContentRow> = self
      .select(
        "strains",
        &[
          ("approved", "eq.true".to_string()),
          ("order", "created_at.desc".to_string()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    rows.into_iter().map(ApiContentRow::into_domain).collect()
  }

  async fn recent_annotations(&self, limit: usize) -> FetchResult<Vec<AnnotationItem>> {
    let rows: Vec<ApiAnnotationRow> = self
      .select(
        "reviews",
        &[
          ("order", "created_at.desc".to_string()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    Ok(rows.into_iter().map(AnnotationItem::from).collect())
  }

  async fn annotations_by_author(
    &self,
    author_id: &str,
    limit: usize,
  ) -> FetchResult<Vec<AnnotationItem>> {
    let rows: Vec<ApiAnnotationRow> = self
      .select(
        "reviews",
        &[
          ("user_id", format!("eq.{}", author_id)),
          ("order", "created_at.desc".to_string()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    Ok(rows.into_iter().map(AnnotationItem::from).collect())
  }

  async fn user_by_id(&self, id: &str) -> FetchResult<User> {
    let mut rows: Vec<ApiUserRow> = self
      .select(
        "users",
        &[("id", format!("eq.{}", id)), ("limit", "1".to_string())],
      )
      .await?;

    rows.pop().map(User::from).ok_or(FetchError::NotFound)
  }

  async fn favorite_for(
    &self,
    owner_id: &str,
    subject_id: &str,
  ) -> FetchResult<Option<FavoriteRelation>> {
    let mut rows: Vec<ApiFavoriteRow> = self
      .select(
        "favorites",
        &[
          ("user_id", format!("eq.{}", owner_id)),
          ("strain_id", format!("eq.{}", subject_id)),
          ("limit", "1".to_string()),
        ],
      )
      .await?;

    Ok(rows.pop().map(FavoriteRelation::from))
  }

  async fn favorites_for_owner(&self, owner_id: &str) -> FetchResult<Vec<FavoriteRelation>> {
    let rows: Vec<ApiFavoriteRow> = self
      .select("favorites", &[("user_id", format!("eq.{}", owner_id))])
      .await?;

    Ok(rows.into_iter().map(FavoriteRelation::from).collect())
  }

  async fn upsert_favorite(&self, relation: &FavoriteRelation) -> FetchResult<()> {
    let url = self.table_url("favorites")?;

    let response = self
      .http
      .post(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .header("Prefer", "resolution=merge-duplicates")
      .json(&serde_json::json!({
        "user_id": relation.owner_id,
        "strain_id": relation.subject_id,
        "is_favorite": relation.is_favorite,
        "is_save_for_later": relation.is_save_for_later,
      }))
      .send()
      .await
      .map_err(|e| FetchError::transient(e.to_string()))?;

    if !response.status().is_success() {
      return Err(FetchError::transient(format!(
        "favorite upsert returned {}",
        response.status()
      )));
    }

    Ok(())
  }

  async fn delete_favorite(&self, owner_id: &str, subject_id: &str) -> FetchResult<()> {
    let mut url = self.table_url("favorites")?;
    url
      .query_pairs_mut()
      .append_pair("user_id", &format!("eq.{}", owner_id))
      .append_pair("strain_id", &format!("eq.{}", subject_id));

    let response = self
      .http
      .delete(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .send()
      .await
      .map_err(|e| FetchError::transient(e.to_string()))?;

    if !response.status().is_success() {
      return Err(FetchError::transient(format!(
        "favorite delete returned {}",
        response.status()
      )));
    }

    Ok(())
  }
}
