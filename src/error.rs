//! Typed failure taxonomy for the data core.
//!
//! Read paths never surface these to the UI as hard failures: callers
//! degrade to the bundled fallback dataset before propagating anything.
//! Mutation paths roll back and notify instead of interrupting.

use std::fmt;

/// Outcome of any remote fetch or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
  /// The entity does not exist. Terminal; not retried.
  NotFound,
  /// Network, timeout, or server-side failure. Triggers fallback on
  /// read paths and rollback on mutation paths.
  Transient(String),
  /// The remote returned data that does not match the expected
  /// contract. Handled like `Transient` but logged distinctly.
  ShapeMismatch(String),
}

impl FetchError {
  pub fn transient(msg: impl Into<String>) -> Self {
    FetchError::Transient(msg.into())
  }

  pub fn shape(msg: impl Into<String>) -> Self {
    FetchError::ShapeMismatch(msg.into())
  }

  /// Whether a read path may substitute the fallback dataset for this
  /// error. `NotFound` is excluded: a missing entity stays missing.
  pub fn is_degradable(&self) -> bool {
    matches!(self, FetchError::Transient(_) | FetchError::ShapeMismatch(_))
  }
}

impl fmt::Display for FetchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FetchError::NotFound => write!(f, "entity not found"),
      FetchError::Transient(msg) => write!(f, "transient backend failure: {}", msg),
      FetchError::ShapeMismatch(msg) => write!(f, "unexpected response shape: {}", msg),
    }
  }
}

impl std::error::Error for FetchError {}

pub type FetchResult<T> = Result<T, FetchError>;
