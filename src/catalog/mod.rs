//! HighMark catalog domain: wire rows, remote sources, and the cached
//! read adapter.

mod api_types;
mod cache;
mod cached_client;
mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use cached_client::CachedCatalog;
pub use client::{DataSource, RestDataSource};
