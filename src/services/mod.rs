pub mod discovery;
pub mod fetcher;
pub mod movie_details;
pub mod providers;
pub mod query;
pub mod selector;

pub use discovery::DiscoveryService;
pub use providers::{CatalogProvider, TmdbProvider};
