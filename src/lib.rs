//! Client data-availability core for the HighMark content browser.
//!
//! Screens never talk to the backend directly; they go through this
//! crate, which decides which source serves each read (shared in-memory
//! cache, remote source, or the bundled fallback dataset), keeps writes
//! perceptually instant via optimistic toggles with rollback, and warms
//! the cache ahead of navigation. Read surfaces degrade to stale or
//! bundled data rather than fail; only a detail fetch for an id that
//! exists nowhere reports not-found.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod favorites;
pub mod images;
pub mod notice;
pub mod prefetch;
pub mod session;

pub use cache::{EntityCache, Origin, Sourced};
pub use catalog::{CachedCatalog, DataSource, RestDataSource};
pub use config::Config;
pub use error::{FetchError, FetchResult};
pub use fallback::FallbackDataset;
pub use favorites::FavoritesController;
pub use images::{ImageRef, ImageResolver, ImageSource, PublicBucketStorage, StorageProvider};
pub use notice::Notice;
pub use prefetch::PrefetchScheduler;
pub use session::{SessionProvider, StaticSession};
