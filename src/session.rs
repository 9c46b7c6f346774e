//! Session collaborator seam.
//!
//! The auth subsystem lives outside this core; all the core needs is the
//! current user id, synchronously.

use std::sync::Arc;

/// Source of the signed-in user's id, if any.
pub trait SessionProvider: Send + Sync {
  fn current_user_id(&self) -> Option<String>;
}

/// Fixed session state, for tools and tests.
pub struct StaticSession {
  user_id: Option<String>,
}

impl StaticSession {
  pub fn signed_in(user_id: impl Into<String>) -> Arc<Self> {
    Arc::new(Self {
      user_id: Some(user_id.into()),
    })
  }

  pub fn signed_out() -> Arc<Self> {
    Arc::new(Self { user_id: None })
  }
}

impl SessionProvider for StaticSession {
  fn current_user_id(&self) -> Option<String> {
    self.user_id.clone()
  }
}
