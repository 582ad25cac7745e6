pub mod store;

pub use store::{CacheConfig, CacheEntry, CacheKey, CacheStore, Freshness};
