use std::sync::Arc;

use crate::{
    cache::{CacheConfig, CacheStore},
    clock::{Clock, SystemClock},
    config::Config,
    error::{AppError, AppResult},
    random::{RandomSource, SeededRandom, ThreadRandom},
    services::{CatalogProvider, DiscoveryService, TmdbProvider},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` while no access token is configured
    catalog: Option<Arc<dyn CatalogProvider>>,
    pub discovery: Arc<DiscoveryService>,
}

impl AppState {
    pub fn new(
        catalog: Option<Arc<dyn CatalogProvider>>,
        discovery: Arc<DiscoveryService>,
    ) -> Self {
        Self { catalog, discovery }
    }

    /// Builds the production state: TMDB provider, system clock, and a
    /// seeded or thread-local random source
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let random: Arc<dyn RandomSource> = match config.random_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };

        let cache = Arc::new(CacheStore::new(
            CacheConfig::new()
                .ttl(config.cache_ttl())
                .max_entries(config.cache_max_entries),
            Arc::clone(&clock),
        ));

        let catalog = match config.token() {
            Some(token) => {
                let provider =
                    TmdbProvider::new(token, config.tmdb_api_url.as_str(), config.http_timeout())?;
                Some(Arc::new(provider) as Arc<dyn CatalogProvider>)
            }
            None => None,
        };

        let discovery = Arc::new(DiscoveryService::new(cache, random, clock));

        Ok(Self::new(catalog, discovery))
    }

    /// The configured catalog, or [`AppError::MissingCredential`]
    pub fn catalog(&self) -> AppResult<Arc<dyn CatalogProvider>> {
        self.catalog.clone().ok_or(AppError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        Config::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_state_without_token_has_no_catalog() {
        let state = AppState::from_config(&config(&[])).unwrap();
        assert!(matches!(state.catalog(), Err(AppError::MissingCredential)));
    }

    #[test]
    fn test_state_with_token_has_catalog() {
        let state =
            AppState::from_config(&config(&[("TMDB_READ_ACCESS_TOKEN", "token")])).unwrap();
        assert_eq!(state.catalog().unwrap().name(), "tmdb");
    }

    #[test]
    fn test_state_uses_configured_ttl() {
        let state = AppState::from_config(&config(&[("CACHE_TTL_SECS", "120")])).unwrap();
        assert_eq!(
            state.discovery.cache().ttl(),
            std::time::Duration::from_secs(120)
        );
    }
}
