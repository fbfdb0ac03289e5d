//! External title catalog abstraction.
//!
//! The rest of the crate only needs two lookups from a catalog: free-text
//! search and metadata by id. Implementations own their HTTP client, their
//! credentials and any response caching.

use crate::{
    error::AppResult,
    models::{CatalogDetails, CatalogKind, CatalogSearchResult, SearchScope},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search titles by name; movies come before TV shows
    async fn search(&self, query: &str, scope: SearchScope) -> AppResult<Vec<CatalogSearchResult>>;

    /// Full metadata for one catalog id
    async fn details(&self, id: i64, kind: CatalogKind) -> AppResult<CatalogDetails>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
