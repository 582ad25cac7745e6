//! Movie catalog provider abstraction
//!
//! The discovery pipeline and the detail lookup only talk to the catalog
//! through [`CatalogProvider`], so tests can swap in a mock and the HTTP
//! client stays in one place.

use crate::{
    error::AppResult,
    models::{RawItem, RawMovieDetails},
    services::query::QueryParams,
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page of discovery results
    ///
    /// Returns the raw records of the page in upstream order. Fails on a
    /// non-success status or a body that is not a discovery page.
    async fn discover_page(&self, params: &QueryParams, page: u32) -> AppResult<Vec<RawItem>>;

    /// Fetch a single movie record in the given language (e.g. `ja-JP`)
    async fn movie_details(&self, id: &str, language: &str) -> AppResult<RawMovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
