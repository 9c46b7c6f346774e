//! Optimistic favorite/save toggles with rollback.
//!
//! A toggle flips the displayed state synchronously with the user
//! gesture, then reconciles with the remote source in the background.
//! Reconciliations are serialized per `(owner, subject)` key, and each
//! one writes the *latest* displayed state, so rapid toggles supersede
//! each other instead of racing: once everything settles, the displayed
//! state and the committed remote state are identical. A failed write
//! rolls the displayed state back to the last committed value and emits
//! a non-blocking notice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, Mutex as AsyncMutex, Notify};
use tracing::warn;

use crate::catalog::types::FavoriteRelation;
use crate::catalog::DataSource;
use crate::error::FetchResult;
use crate::notice::Notice;
use crate::session::SessionProvider;

type RelationKey = (String, String);

/// Which boolean facet of the relation a toggle targets.
#[derive(Debug, Clone, Copy)]
enum Facet {
  Favorite,
  SaveForLater,
}

#[derive(Debug, Clone)]
struct RelationState {
  /// What the UI currently shows.
  displayed: FavoriteRelation,
  /// The last state known to be committed remotely.
  committed: FavoriteRelation,
}

impl RelationState {
  fn absent(owner_id: &str, subject_id: &str) -> Self {
    let relation = FavoriteRelation::absent(owner_id, subject_id);
    Self {
      displayed: relation.clone(),
      committed: relation,
    }
  }

  fn settled(&self) -> bool {
    self.displayed == self.committed
  }
}

/// Controller for the per-user favorite/save-for-later relation.
///
/// Must be used from within a tokio runtime; reconciliations run as
/// detached tasks.
pub struct FavoritesController {
  source: Arc<dyn DataSource>,
  session: Arc<dyn SessionProvider>,
  state: Arc<Mutex<HashMap<RelationKey, RelationState>>>,
  key_locks: Arc<Mutex<HashMap<RelationKey, Arc<AsyncMutex<()>>>>>,
  pending: Arc<AtomicUsize>,
  quiescent: Arc<Notify>,
  notices: Option<mpsc::UnboundedSender<Notice>>,
}

impl FavoritesController {
  pub fn new(source: Arc<dyn DataSource>, session: Arc<dyn SessionProvider>) -> Self {
    Self {
      source,
      session,
      state: Arc::new(Mutex::new(HashMap::new())),
      key_locks: Arc::new(Mutex::new(HashMap::new())),
      pending: Arc::new(AtomicUsize::new(0)),
      quiescent: Arc::new(Notify::new()),
      notices: None,
    }
  }

  /// Route rollback notifications to the given channel.
  pub fn with_notices(mut self, notices: mpsc::UnboundedSender<Notice>) -> Self {
    self.notices = Some(notices);
    self
  }

  /// Flip the favorite facet for the signed-in user.
  ///
  /// Returns the new displayed value immediately; the remote write
  /// happens in the background. `None` when nobody is signed in.
  pub fn toggle_favorite(&self, subject_id: &str) -> Option<bool> {
    self.toggle(Facet::Favorite, subject_id)
  }

  /// Flip the save-for-later facet. Same protocol as a favorite toggle.
  pub fn toggle_save_for_later(&self, subject_id: &str) -> Option<bool> {
    self.toggle(Facet::SaveForLater, subject_id)
  }

  fn toggle(&self, facet: Facet, subject_id: &str) -> Option<bool> {
    let owner_id = self.session.current_user_id()?;
    let key = (owner_id.clone(), subject_id.to_string());

    let new_value = {
      let mut state = lock(&self.state);
      let entry = state
        .entry(key.clone())
        .or_insert_with(|| RelationState::absent(&owner_id, subject_id));
      let displayed = &mut entry.displayed;
      match facet {
        Facet::Favorite => {
          displayed.is_favorite = !displayed.is_favorite;
          displayed.is_favorite
        }
        Facet::SaveForLater => {
          displayed.is_save_for_later = !displayed.is_save_for_later;
          displayed.is_save_for_later
        }
      }
    };

    self.spawn_reconcile(key);
    Some(new_value)
  }

  /// The displayed favorite value, defaulting to false when unknown.
  pub fn is_favorite(&self, subject_id: &str) -> bool {
    self
      .relation(subject_id)
      .map(|relation| relation.is_favorite)
      .unwrap_or(false)
  }

  /// Displayed relation snapshot for the signed-in user, if one has
  /// been toggled or hydrated this session.
  pub fn relation(&self, subject_id: &str) -> Option<FavoriteRelation> {
    let owner_id = self.session.current_user_id()?;
    let state = lock(&self.state);
    state
      .get(&(owner_id, subject_id.to_string()))
      .map(|entry| entry.displayed.clone())
  }

  /// Prime the displayed state from the remote source.
  ///
  /// Remote wins, except while an optimistic change is still
  /// reconciling; that change would otherwise be silently undone.
  pub async fn hydrate(&self, subject_id: &str) -> FetchResult<Option<FavoriteRelation>> {
    let Some(owner_id) = self.session.current_user_id() else {
      return Ok(None);
    };

    let remote = self.source.favorite_for(&owner_id, subject_id).await?;
    let relation = remote.unwrap_or_else(|| FavoriteRelation::absent(&owner_id, subject_id));

    let key = (owner_id, subject_id.to_string());
    let mut state = lock(&self.state);
    let entry = state.entry(key).or_insert_with(|| RelationState {
      displayed: relation.clone(),
      committed: relation.clone(),
    });
    if entry.settled() {
      entry.displayed = relation.clone();
      entry.committed = relation;
    }

    Ok(Some(entry.displayed.clone()))
  }

  /// Subject ids the signed-in user has favorited, from the remote
  /// source. Also primes the local displayed state.
  pub async fn favorite_subjects(&self) -> FetchResult<Vec<String>> {
    let Some(owner_id) = self.session.current_user_id() else {
      return Ok(Vec::new());
    };

    let rows = self.source.favorites_for_owner(&owner_id).await?;

    {
      let mut state = lock(&self.state);
      for relation in &rows {
        let key = (relation.owner_id.clone(), relation.subject_id.clone());
        let entry = state.entry(key).or_insert_with(|| RelationState {
          displayed: relation.clone(),
          committed: relation.clone(),
        });
        if entry.settled() {
          entry.displayed = relation.clone();
          entry.committed = relation.clone();
        }
      }
    }

    Ok(
      rows
        .into_iter()
        .filter(|relation| relation.is_favorite)
        .map(|relation| relation.subject_id)
        .collect(),
    )
  }

  /// Wait until every spawned reconciliation has completed.
  pub async fn settled(&self) {
    loop {
      // Register the waiter before re-checking, so a notification
      // landing in between is not lost
      let notified = self.quiescent.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();
      if self.pending.load(Ordering::SeqCst) == 0 {
        return;
      }
      notified.await;
    }
  }

  fn spawn_reconcile(&self, key: RelationKey) {
    self.pending.fetch_add(1, Ordering::SeqCst);

    let source = Arc::clone(&self.source);
    let state = Arc::clone(&self.state);
    let key_locks = Arc::clone(&self.key_locks);
    let pending = Arc::clone(&self.pending);
    let quiescent = Arc::clone(&self.quiescent);
    let notices = self.notices.clone();

    tokio::spawn(async move {
      reconcile(source, state, key_locks, notices, key).await;
      if pending.fetch_sub(1, Ordering::SeqCst) == 1 {
        quiescent.notify_waiters();
      }
    });
  }
}

/// Push one key's displayed state to the remote source.
///
/// Holds the key's lock for the whole write so reconciliations for the
/// same relation are strictly serialized. The snapshot is re-read under
/// the lock: a reconciliation spawned by an older toggle writes the
/// newest displayed state, and skips the write entirely when a
/// predecessor already committed it.
async fn reconcile(
  source: Arc<dyn DataSource>,
  state: Arc<Mutex<HashMap<RelationKey, RelationState>>>,
  key_locks: Arc<Mutex<HashMap<RelationKey, Arc<AsyncMutex<()>>>>>,
  notices: Option<mpsc::UnboundedSender<Notice>>,
  key: RelationKey,
) {
  let key_lock = {
    let mut locks = lock(&key_locks);
    Arc::clone(locks.entry(key.clone()).or_default())
  };
  let _guard = key_lock.lock().await;

  let snapshot = {
    let state_map = lock(&state);
    state_map.get(&key).cloned()
  };
  let Some(snapshot) = snapshot else {
    return;
  };
  if snapshot.settled() {
    return;
  }

  // A relation with both facets false is persisted as no row at all
  let result = if snapshot.displayed.is_absent() {
    source.delete_favorite(&key.0, &key.1).await
  } else {
    source.upsert_favorite(&snapshot.displayed).await
  };

  match result {
    Ok(()) => {
      let mut state_map = lock(&state);
      if let Some(entry) = state_map.get_mut(&key) {
        entry.committed = snapshot.displayed;
      }
    }
    Err(err) => {
      {
        let mut state_map = lock(&state);
        if let Some(entry) = state_map.get_mut(&key) {
          entry.displayed = entry.committed.clone();
        }
      }
      warn!(subject = %key.1, error = %err, "favorite sync failed, rolled back");
      if let Some(tx) = &notices {
        let _ = tx.send(Notice::FavoriteSyncFailed {
          subject_id: key.1.clone(),
          reason: err.to_string(),
        });
      }
    }
  }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
