//! Bundled fallback dataset.
//!
//! A fixed snapshot of sample content, annotations, and users served
//! whenever the remote source is unavailable or returns nothing for a
//! surface that must render something. Pure, synchronous, and
//! deterministic; never written back to the remote source.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::types::{AnnotationItem, Category, ContentItem, User};
use crate::images::ImageRef;

pub struct FallbackDataset {
  content: Vec<ContentItem>,
  annotations: Vec<AnnotationItem>,
  users: Vec<User>,
}

impl FallbackDataset {
  /// The snapshot shipped with the app.
  pub fn bundled() -> Self {
    Self {
      content: vec![
        content_item(
          "s1",
          "Blue Dream",
          Category::Hybrid,
          18.0,
          0.5,
          &["Relaxed", "Happy", "Euphoric", "Creative"],
          &["Berry", "Sweet", "Earthy"],
          "A legendary hybrid strain known for its balanced effects. Blue Dream delivers a \
           gentle cerebral invigoration alongside full-body relaxation, making it perfect for \
           daytime use.",
          ts(2024, 1, 1),
          "u1",
        ),
        content_item(
          "s2",
          "OG Kush",
          Category::Indica,
          23.0,
          0.3,
          &["Relaxed", "Sleepy", "Happy"],
          &["Pine", "Woody", "Earthy"],
          "A classic indica strain with powerful effects. OG Kush is known for its strong pine \
           and woody aroma, delivering deep relaxation and stress relief.",
          ts(2024, 1, 2),
          "u2",
        ),
        content_item(
          "s3",
          "Sour Diesel",
          Category::Sativa,
          20.0,
          0.2,
          &["Energetic", "Focused", "Creative"],
          &["Diesel", "Citrus", "Earthy"],
          "A fast-acting sativa with energizing effects. Sour Diesel features a pungent \
           fuel-like aroma and provides a dreamy cerebral effect perfect for creative pursuits.",
          ts(2024, 1, 3),
          "u1",
        ),
      ],
      annotations: vec![
        annotation(
          "r1",
          "u1",
          "s1",
          4.5,
          "Perfect balance of relaxation and creativity. Great for afternoon use!",
          &["Relaxed", "Creative", "Happy"],
          &["Berry", "Sweet"],
          ts(2024, 1, 10),
        ),
        annotation(
          "r2",
          "u2",
          "s2",
          5.0,
          "Classic OG Kush. Amazing for stress relief and sleep.",
          &["Relaxed", "Sleepy"],
          &["Pine", "Woody"],
          ts(2024, 1, 11),
        ),
        annotation(
          "r3",
          "u1",
          "s3",
          4.0,
          "Great for morning use. Really helps with focus and creativity.",
          &["Energetic", "Focused"],
          &["Diesel", "Citrus"],
          ts(2024, 1, 12),
        ),
      ],
      users: vec![
        user(
          "u1",
          "JaneGreen",
          "https://ui-avatars.com/api/?name=Jane+Green",
          "Cannabis enthusiast and reviewer. Love exploring new strains!",
          ts(2024, 1, 1),
        ),
        user(
          "u2",
          "MikeBlaze",
          "https://ui-avatars.com/api/?name=Mike+Blaze",
          "Medicinal cannabis advocate. Sharing honest reviews.",
          ts(2024, 1, 2),
        ),
      ],
    }
  }

  pub fn content(&self) -> &[ContentItem] {
    &self.content
  }

  pub fn content_by_id(&self, id: &str) -> Option<ContentItem> {
    self.content.iter().find(|item| item.id == id).cloned()
  }

  pub fn annotations_for(&self, subject_id: &str) -> Vec<AnnotationItem> {
    self
      .annotations
      .iter()
      .filter(|annotation| annotation.subject_id == subject_id)
      .cloned()
      .collect()
  }

  pub fn recent_annotations(&self, limit: usize) -> Vec<AnnotationItem> {
    let mut annotations = self.annotations.clone();
    annotations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    annotations.truncate(limit);
    annotations
  }

  pub fn annotations_by_author(&self, author_id: &str, limit: usize) -> Vec<AnnotationItem> {
    let mut annotations: Vec<AnnotationItem> = self
      .annotations
      .iter()
      .filter(|annotation| annotation.author_id == author_id)
      .cloned()
      .collect();
    annotations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    annotations.truncate(limit);
    annotations
  }

  pub fn user_by_id(&self, id: &str) -> Option<User> {
    self.users.iter().find(|user| user.id == id).cloned()
  }

  /// Approved items, newest first. Same order every call.
  pub fn featured(&self, limit: usize) -> Vec<ContentItem> {
    let mut items: Vec<ContentItem> = self
      .content
      .iter()
      .filter(|item| item.is_approved)
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    items
  }
}

impl Default for FallbackDataset {
  fn default() -> Self {
    Self::bundled()
  }
}

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, 0, 0, 0)
    .single()
    .unwrap_or(DateTime::UNIX_EPOCH)
}

fn tags(values: &[&str]) -> Vec<String> {
  values.iter().map(|value| value.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn content_item(
  id: &str,
  name: &str,
  category: Category,
  thc: f64,
  cbd: f64,
  effects: &[&str],
  flavors: &[&str],
  description: &str,
  created_at: DateTime<Utc>,
  owner_id: &str,
) -> ContentItem {
  let mut potency_metrics = BTreeMap::new();
  potency_metrics.insert("thc".to_string(), thc);
  potency_metrics.insert("cbd".to_string(), cbd);

  ContentItem {
    id: id.to_string(),
    display_name: name.to_string(),
    category,
    potency_metrics,
    effect_tags: tags(effects),
    flavor_tags: tags(flavors),
    description: Some(description.to_string()),
    // Snapshot items render from the bundled legacy assets, so the
    // fallback needs no network at all
    primary_image: ImageRef::LegacyKey(id.to_string()),
    gallery_images: vec![ImageRef::LegacyKey(id.to_string())],
    is_approved: true,
    is_featured: true,
    created_at,
    owner_id: owner_id.to_string(),
  }
}

#[allow(clippy::too_many_arguments)]
fn annotation(
  id: &str,
  author_id: &str,
  subject_id: &str,
  score: f32,
  body: &str,
  effects: &[&str],
  flavors: &[&str],
  created_at: DateTime<Utc>,
) -> AnnotationItem {
  AnnotationItem {
    id: id.to_string(),
    author_id: author_id.to_string(),
    subject_id: subject_id.to_string(),
    score,
    body: body.to_string(),
    effect_tags: tags(effects),
    flavor_tags: tags(flavors),
    created_at,
  }
}

fn user(id: &str, username: &str, avatar_url: &str, bio: &str, created_at: DateTime<Utc>) -> User {
  User {
    id: id.to_string(),
    username: username.to_string(),
    avatar: ImageRef::classify(Some(avatar_url)),
    bio: bio.to_string(),
    created_at,
  }
}
