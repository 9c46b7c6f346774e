//! Non-blocking notification channel.
//!
//! Low-stakes failures (a favorite toggle that could not be synced) are
//! reported here rather than as modal errors. Screens may subscribe or
//! ignore the receiver entirely; sends are best-effort.

use tokio::sync::mpsc;

/// A notification the UI may surface as a toast or status line.
#[derive(Debug, Clone)]
pub enum Notice {
  /// A favorite/save toggle was rolled back after the remote write failed.
  FavoriteSyncFailed { subject_id: String, reason: String },
}

/// Create a notice channel pair.
pub fn channel() -> (mpsc::UnboundedSender<Notice>, mpsc::UnboundedReceiver<Notice>) {
  mpsc::unbounded_channel()
}
