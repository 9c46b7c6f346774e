//! Scriptable in-memory data source for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::DataSource;
use super::types::{AnnotationItem, ContentItem, FavoriteRelation, User};
use crate::error::{FetchError, FetchResult};

type RelationKey = (String, String);

/// In-memory `DataSource` with switchable failure modes and call
/// counters, so tests can assert the resilience policy directly.
#[derive(Default)]
pub struct MockDataSource {
  content: Mutex<HashMap<String, ContentItem>>,
  annotations: Mutex<HashMap<String, Vec<AnnotationItem>>>,
  users: Mutex<HashMap<String, User>>,
  favorites: Mutex<HashMap<RelationKey, FavoriteRelation>>,
  fail_reads: AtomicBool,
  fail_writes: AtomicBool,
  mismatch_reads: AtomicBool,
  pub content_fetches: AtomicUsize,
  pub annotation_fetches: AtomicUsize,
  pub upsert_calls: AtomicUsize,
  pub delete_calls: AtomicUsize,
}

impl MockDataSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_content(&self, item: ContentItem) {
    lock(&self.content).insert(item.id.clone(), item);
  }

  pub fn insert_annotations(&self, subject_id: &str, items: Vec<AnnotationItem>) {
    lock(&self.annotations).insert(subject_id.to_string(), items);
  }

  pub fn insert_user(&self, user: User) {
    lock(&self.users).insert(user.id.clone(), user);
  }

  pub fn set_favorite(&self, relation: FavoriteRelation) {
    let key = (relation.owner_id.clone(), relation.subject_id.clone());
    lock(&self.favorites).insert(key, relation);
  }

  pub fn favorite(&self, owner_id: &str, subject_id: &str) -> Option<FavoriteRelation> {
    lock(&self.favorites)
      .get(&(owner_id.to_string(), subject_id.to_string()))
      .cloned()
  }

  /// Make every read fail with `Transient`.
  pub fn fail_reads(&self, on: bool) {
    self.fail_reads.store(on, Ordering::SeqCst);
  }

  /// Make every write fail with `Transient`.
  pub fn fail_writes(&self, on: bool) {
    self.fail_writes.store(on, Ordering::SeqCst);
  }

  /// Make every read fail with `ShapeMismatch`.
  pub fn mismatch_reads(&self, on: bool) {
    self.mismatch_reads.store(on, Ordering::SeqCst);
  }

  fn read_gate(&self) -> FetchResult<()> {
    if self.mismatch_reads.load(Ordering::SeqCst) {
      return Err(FetchError::shape("scripted shape mismatch"));
    }
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(FetchError::transient("scripted outage"));
    }
    Ok(())
  }

  fn write_gate(&self) -> FetchResult<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(FetchError::transient("scripted write failure"));
    }
    Ok(())
  }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl DataSource for MockDataSource {
  async fn content_item_by_id(&self, id: &str) -> FetchResult<ContentItem> {
    self.content_fetches.fetch_add(1, Ordering::SeqCst);
    self.read_gate()?;
    lock(&self.content).get(id).cloned().ok_or(FetchError::NotFound)
  }

  async fn annotations_for(&self, subject_id: &str) -> FetchResult<Vec<AnnotationItem>> {
    self.annotation_fetches.fetch_add(1, Ordering::SeqCst);
    self.read_gate()?;
    Ok(lock(&self.annotations).get(subject_id).cloned().unwrap_or_default())
  }

  async fn featured_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>> {
    self.read_gate()?;
    let mut items: Vec<ContentItem> = lock(&self.content)
      .values()
      .filter(|item| item.is_featured && item.is_approved)
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    Ok(items)
  }

  async fn recent_content(&self, limit: usize) -> FetchResult<Vec<ContentItem>> {
    self.read_gate()?;
    let mut items: Vec<ContentItem> = lock(&self.content)
      .values()
      .filter(|item| item.is_approved)
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    Ok(items)
  }

  async fn recent_annotations(&self, limit: usize) -> FetchResult<Vec<AnnotationItem>> {
    self.read_gate()?;
    let mut items: Vec<AnnotationItem> =
      lock(&self.annotations).values().flatten().cloned().collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    Ok(items)
  }

  async fn annotations_by_author(
    &self,
    author_id: &str,
    limit: usize,
  ) -> FetchResult<Vec<AnnotationItem>> {
    self.read_gate()?;
    let mut items: Vec<AnnotationItem> = lock(&self.annotations)
      .values()
      .flatten()
      .filter(|annotation| annotation.author_id == author_id)
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    Ok(items)
  }

  async fn user_by_id(&self, id: &str) -> FetchResult<User> {
    self.read_gate()?;
    lock(&self.users).get(id).cloned().ok_or(FetchError::NotFound)
  }

  async fn favorite_for(
    &self,
    owner_id: &str,
    subject_id: &str,
  ) -> FetchResult<Option<FavoriteRelation>> {
    self.read_gate()?;
    Ok(self.favorite(owner_id, subject_id))
  }

  async fn favorites_for_owner(&self, owner_id: &str) -> FetchResult<Vec<FavoriteRelation>> {
    self.read_gate()?;
    Ok(
      lock(&self.favorites)
        .values()
        .filter(|relation| relation.owner_id == owner_id)
        .cloned()
        .collect(),
    )
  }

  async fn upsert_favorite(&self, relation: &FavoriteRelation) -> FetchResult<()> {
    self.upsert_calls.fetch_add(1, Ordering::SeqCst);
    self.write_gate()?;
    self.set_favorite(relation.clone());
    Ok(())
  }

  async fn delete_favorite(&self, owner_id: &str, subject_id: &str) -> FetchResult<()> {
    self.delete_calls.fetch_add(1, Ordering::SeqCst);
    self.write_gate()?;
    lock(&self.favorites).remove(&(owner_id.to_string(), subject_id.to_string()));
    Ok(())
  }
}
