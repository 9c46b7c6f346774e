//! Serde-deserializable types matching backend rows.
//!
//! These types are separate from domain types to allow clean
//! deserialization while keeping domain types focused on application
//! needs. Conversions are fallible: a row that cannot be mapped into
//! the domain contract is a shape mismatch, not a panic.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::{AnnotationItem, Category, ContentItem, FavoriteRelation, User};
use crate::error::FetchError;
use crate::images::ImageRef;

/// Row from the `strains` table.
#[derive(Debug, Deserialize)]
pub struct ApiContentRow {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(rename = "type", default)]
  pub category: String,
  pub thc_percentage: Option<f64>,
  pub cbd_percentage: Option<f64>,
  #[serde(default)]
  pub effects: Vec<String>,
  #[serde(default)]
  pub flavors: Vec<String>,
  pub description: Option<String>,
  pub image_url: Option<String>,
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default)]
  pub approved: bool,
  #[serde(default)]
  pub is_featured: bool,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub submitted_by: String,
}

impl ApiContentRow {
  pub fn into_domain(self) -> Result<ContentItem, FetchError> {
    let category = Category::parse(&self.category).ok_or_else(|| {
      FetchError::shape(format!(
        "content item {}: unknown category {:?}",
        self.id, self.category
      ))
    })?;

    let mut potency_metrics = std::collections::BTreeMap::new();
    if let Some(thc) = self.thc_percentage {
      potency_metrics.insert("thc".to_string(), thc);
    }
    if let Some(cbd) = self.cbd_percentage {
      potency_metrics.insert("cbd".to_string(), cbd);
    }

    Ok(ContentItem {
      id: self.id,
      display_name: self.name,
      category,
      potency_metrics,
      effect_tags: self.effects,
      flavor_tags: self.flavors,
      description: self.description,
      primary_image: ImageRef::classify(self.image_url.as_deref()),
      gallery_images: self
        .images
        .iter()
        .map(|raw| ImageRef::classify(Some(raw.as_str())))
        .collect(),
      is_approved: self.approved,
      is_featured: self.is_featured,
      created_at: self.created_at,
      owner_id: self.submitted_by,
    })
  }
}

/// Row from the `reviews` table.
#[derive(Debug, Deserialize)]
pub struct ApiAnnotationRow {
  pub id: String,
  #[serde(default)]
  pub user_id: String,
  pub strain_id: String,
  #[serde(default)]
  pub rating: f32,
  #[serde(default)]
  pub review_text: String,
  #[serde(default)]
  pub effects: Vec<String>,
  #[serde(default)]
  pub flavors: Vec<String>,
  pub created_at: DateTime<Utc>,
}

impl From<ApiAnnotationRow> for AnnotationItem {
  fn from(row: ApiAnnotationRow) -> Self {
    AnnotationItem {
      id: row.id,
      author_id: row.user_id,
      subject_id: row.strain_id,
      // Scores outside the 0–5 domain are clamped at the boundary
      score: row.rating.clamp(0.0, 5.0),
      body: row.review_text,
      effect_tags: row.effects,
      flavor_tags: row.flavors,
      created_at: row.created_at,
    }
  }
}

/// Row from the `users` table.
#[derive(Debug, Deserialize)]
pub struct ApiUserRow {
  pub id: String,
  #[serde(default)]
  pub username: String,
  pub avatar_url: Option<String>,
  #[serde(default)]
  pub bio: String,
  pub created_at: DateTime<Utc>,
}

impl From<ApiUserRow> for User {
  fn from(row: ApiUserRow) -> Self {
    User {
      id: row.id,
      username: row.username,
      avatar: ImageRef::classify(row.avatar_url.as_deref()),
      bio: row.bio,
      created_at: row.created_at,
    }
  }
}

/// Row from the `favorites` table.
#[derive(Debug, Deserialize)]
pub struct ApiFavoriteRow {
  pub user_id: String,
  pub strain_id: String,
  #[serde(default)]
  pub is_favorite: bool,
  #[serde(default)]
  pub is_save_for_later: bool,
}

impl From<ApiFavoriteRow> for FavoriteRelation {
  fn from(row: ApiFavoriteRow) -> Self {
    FavoriteRelation {
      owner_id: row.user_id,
      subject_id: row.strain_id,
      is_favorite: row.is_favorite,
      is_save_for_later: row.is_save_for_later,
    }
  }
}
