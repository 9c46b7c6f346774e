//! Domain types for the HighMark catalog.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::images::ImageRef;

/// Catalog category for a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
  Indica,
  Sativa,
  Hybrid,
}

impl Category {
  /// Parse a category label case-insensitively.
  pub fn parse(label: &str) -> Option<Self> {
    match label.trim().to_lowercase().as_str() {
      "indica" => Some(Category::Indica),
      "sativa" => Some(Category::Sativa),
      "hybrid" => Some(Category::Hybrid),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Indica => "Indica",
      Category::Sativa => "Sativa",
      Category::Hybrid => "Hybrid",
    }
  }
}

/// A reviewable catalog entry (a strain record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
  pub id: String,
  pub display_name: String,
  pub category: Category,
  /// Named numeric potency attributes ("thc", "cbd"), units implicit.
  pub potency_metrics: BTreeMap<String, f64>,
  /// Display order, duplicates allowed.
  pub effect_tags: Vec<String>,
  pub flavor_tags: Vec<String>,
  pub description: Option<String>,
  pub primary_image: ImageRef,
  pub gallery_images: Vec<ImageRef>,
  /// Unapproved items are visible only to their submitter.
  pub is_approved: bool,
  pub is_featured: bool,
  pub created_at: DateTime<Utc>,
  pub owner_id: String,
}

/// A user-authored review of a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationItem {
  pub id: String,
  pub author_id: String,
  pub subject_id: String,
  /// 0–5, half steps permitted.
  pub score: f32,
  pub body: String,
  pub effect_tags: Vec<String>,
  pub flavor_tags: Vec<String>,
  pub created_at: DateTime<Utc>,
}

/// A user profile, as far as this core needs one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  pub username: String,
  pub avatar: ImageRef,
  pub bio: String,
  pub created_at: DateTime<Utc>,
}

/// Per-user, per-item relation row holding two independent boolean
/// facets. A row with both facets false is logically absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRelation {
  pub owner_id: String,
  pub subject_id: String,
  pub is_favorite: bool,
  pub is_save_for_later: bool,
}

impl FavoriteRelation {
  pub fn absent(owner_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
    Self {
      owner_id: owner_id.into(),
      subject_id: subject_id.into(),
      is_favorite: false,
      is_save_for_later: false,
    }
  }

  /// Both facets false: readers treat the relation as nonexistent.
  pub fn is_absent(&self) -> bool {
    !self.is_favorite && !self.is_save_for_later
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_category_parse_is_case_insensitive() {
    assert_eq!(Category::parse("Indica"), Some(Category::Indica));
    assert_eq!(Category::parse("sativa"), Some(Category::Sativa));
    assert_eq!(Category::parse("HYBRID"), Some(Category::Hybrid));
    assert_eq!(Category::parse("other"), None);
  }

  #[test]
  fn test_relation_with_both_facets_false_is_absent() {
    let mut relation = FavoriteRelation::absent("u1", "c1");
    assert!(relation.is_absent());
    relation.is_save_for_later = true;
    assert!(!relation.is_absent());
  }
}
