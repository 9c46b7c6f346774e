//! Shared in-memory entity cache.
//!
//! This module provides the process-wide cache that screens read and
//! prime:
//! - Caches content items and annotation lists keyed by entity id
//! - Lives for the process lifetime with no eviction or TTL
//! - Tracks in-flight prefetches so repeated hints coalesce

mod store;
mod traits;

pub use store::{EntityCache, EntityMap};
pub use traits::{Cacheable, Origin, Sourced};
