//! Shared entity builders for tests.

use chrono::{DateTime, TimeZone, Utc};

use super::types::{AnnotationItem, Category, ContentItem, User};
use crate::images::ImageRef;

pub fn ts(day: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2024, 6, day, 0, 0, 0)
    .single()
    .unwrap_or(DateTime::UNIX_EPOCH)
}

pub fn content_item(id: &str) -> ContentItem {
  ContentItem {
    id: id.to_string(),
    display_name: format!("Item {}", id),
    category: Category::Hybrid,
    potency_metrics: [("thc".to_string(), 18.0)].into_iter().collect(),
    effect_tags: vec!["Relaxed".to_string()],
    flavor_tags: vec!["Berry".to_string()],
    description: None,
    primary_image: ImageRef::Absent,
    gallery_images: Vec::new(),
    is_approved: true,
    is_featured: false,
    created_at: ts(1),
    owner_id: "u1".to_string(),
  }
}

pub fn annotation(id: &str, subject_id: &str) -> AnnotationItem {
  AnnotationItem {
    id: id.to_string(),
    author_id: "u1".to_string(),
    subject_id: subject_id.to_string(),
    score: 4.5,
    body: "Solid pick.".to_string(),
    effect_tags: Vec::new(),
    flavor_tags: Vec::new(),
    created_at: ts(2),
  }
}

pub fn user(id: &str) -> User {
  User {
    id: id.to_string(),
    username: format!("user-{}", id),
    avatar: ImageRef::Absent,
    bio: String::new(),
    created_at: ts(1),
  }
}
