use std::sync::Arc;

use crate::{
    cache::{CacheKey, CacheStore, Freshness},
    clock::Clock,
    error::{AppError, AppResult},
    models::{DiscoverRequest, DiscoverResponse, RawItem},
    random::RandomSource,
    services::{fetcher, providers::CatalogProvider, query, selector},
};

/// Orchestrates one discovery request: cache lookup, upstream fetch, stale
/// fallback and the final pick.
///
/// The cache, clock and random source are injected so one instance can be
/// shared by every request while tests drive time and randomness.
pub struct DiscoveryService {
    cache: Arc<CacheStore>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl DiscoveryService {
    pub fn new(
        cache: Arc<CacheStore>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            random,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Runs the discovery pipeline for `request`.
    ///
    /// The cache key is built from the raw inputs, so a `surprise` request
    /// shares its entry with later `surprise` requests regardless of which
    /// level it resolved to.
    pub async fn discover(
        &self,
        catalog: Arc<dyn CatalogProvider>,
        request: &DiscoverRequest,
    ) -> AppResult<DiscoverResponse> {
        let filters = request.filters();
        let scare = filters.scare.resolve(self.random.as_ref());
        let key = CacheKey::discover(request);

        if let Some(cached) = self.cache.get(&key, Freshness::Fresh).await {
            if !cached.is_empty() {
                tracing::info!(key = %key, results = cached.len(), "Discovery cache hit");
                return Ok(self.respond(&cached, true, false));
            }
        }

        tracing::info!(key = %key, scare = ?scare, "Discovery cache miss");

        let params = query::build_query_params(
            scare,
            filters.runtime,
            filters.era,
            filters.locale,
            self.clock.current_year(),
        );

        match fetcher::fetch_aggregate(catalog, &params, scare, self.random.as_ref()).await {
            Ok(results) => {
                if results.is_empty() {
                    tracing::info!(key = %key, "Discovery returned no results");
                } else {
                    self.cache.put(key, results.clone()).await;
                }
                Ok(self.respond(&results, false, false))
            }
            Err(e) => self.stale_fallback(&key, e).await,
        }
    }

    async fn stale_fallback(&self, key: &CacheKey, error: AppError) -> AppResult<DiscoverResponse> {
        match self.cache.get(key, Freshness::AllowStale).await {
            Some(stale) if !stale.is_empty() => {
                tracing::warn!(
                    key = %key,
                    error = %error,
                    results = stale.len(),
                    "Upstream failed, serving stale discovery results"
                );
                Ok(self.respond(&stale, true, true))
            }
            _ => {
                tracing::error!(
                    key = %key,
                    error = %error,
                    upstream = error.is_upstream(),
                    "Upstream failed with no cached discovery results"
                );
                Err(AppError::DiscoveryUnavailable)
            }
        }
    }

    fn respond(&self, results: &[RawItem], cached: bool, stale: bool) -> DiscoverResponse {
        let picked = selector::pick(results, self.random.as_ref());
        DiscoverResponse::new(results, picked, cached, stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::clock::ManualClock;
    use crate::services::providers::MockCatalogProvider;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted draws, then repeats the last one
    struct Scripted(Mutex<Vec<usize>>);

    impl Scripted {
        fn new(draws: &[usize]) -> Self {
            let mut draws = draws.to_vec();
            draws.reverse();
            Self(Mutex::new(draws))
        }
    }

    impl RandomSource for Scripted {
        fn below(&self, upper: usize) -> usize {
            let mut draws = self.0.lock().unwrap();
            let draw = if draws.len() > 1 {
                draws.pop().unwrap()
            } else {
                draws.first().copied().unwrap_or(0)
            };
            draw % upper.max(1)
        }
    }

    fn page(page: u32, count: usize) -> Vec<RawItem> {
        (0..count)
            .map(|i| json!({ "id": page as usize * 100 + i, "title": format!("Movie {}-{}", page, i) }))
            .collect()
    }

    fn service(random: Arc<dyn RandomSource>) -> (DiscoveryService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(2025));
        let cache = Arc::new(CacheStore::new(CacheConfig::new(), clock.clone()));
        (DiscoveryService::new(cache, random, clock.clone()), clock)
    }

    fn healthy_catalog(expected_pages: usize) -> Arc<dyn CatalogProvider> {
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .times(expected_pages)
            .returning(|_, p| Ok(page(p, 10)));
        Arc::new(mock)
    }

    fn failing_catalog() -> Arc<dyn CatalogProvider> {
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .returning(|_, _| Err(AppError::ExternalApi("status 500".to_string())));
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_miss_fetches_two_pages_and_stores_one_entry() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[7])));
        let request = DiscoverRequest::new("light", "medium", "any");

        let response = service.discover(healthy_catalog(2), &request).await.unwrap();

        assert_eq!(response.results.len(), 20);
        assert!(!response.cached);
        assert!(!response.stale);
        assert_eq!(response.picked.as_ref(), Some(&response.results[7]));
        assert_eq!(service.cache().len().await, 1);
        assert!(service
            .cache()
            .get(&CacheKey::discover(&request), Freshness::Fresh)
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_upstream() {
        let (service, clock) = service(Arc::new(Scripted::new(&[0])));
        let request = DiscoverRequest::new("light", "medium", "any");

        let first = service.discover(healthy_catalog(2), &request).await.unwrap();
        clock.advance(Duration::from_secs(59 * 60));
        let second = service.discover(healthy_catalog(0), &request).await.unwrap();

        assert!(second.cached);
        assert!(!second.stale);
        assert_eq!(second.results, first.results);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (service, clock) = service(Arc::new(Scripted::new(&[0])));
        let request = DiscoverRequest::new("normal", "short", "new");

        service.discover(healthy_catalog(2), &request).await.unwrap();
        clock.advance(Duration::from_secs(3600));
        let response = service.discover(healthy_catalog(2), &request).await.unwrap();

        assert!(!response.cached);
    }

    #[tokio::test]
    async fn test_failure_serves_stale_entry() {
        let (service, clock) = service(Arc::new(Scripted::new(&[3])));
        let request = DiscoverRequest::new("light", "medium", "any");

        let first = service.discover(healthy_catalog(2), &request).await.unwrap();
        clock.advance(Duration::from_secs(2 * 3600));
        let response = service.discover(failing_catalog(), &request).await.unwrap();

        assert!(response.cached);
        assert!(response.stale);
        assert_eq!(response.results, first.results);
        assert!(response.picked.is_some());
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_unavailable() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[0])));
        let request = DiscoverRequest::default();

        let err = service.discover(failing_catalog(), &request).await.unwrap_err();

        assert!(matches!(err, AppError::DiscoveryUnavailable));
        assert!(service.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_aggregate_is_success_without_pick() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[0])));
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));

        let response = service
            .discover(Arc::new(mock), &DiscoverRequest::default())
            .await
            .unwrap();

        assert!(response.results.is_empty());
        assert_eq!(response.picked, None);
        assert!(!response.cached);
        assert!(service.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_strong_sets_adult_flag_and_samples_pages() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[1, 4, 0])));
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .withf(|params, page| {
                params.get("include_adult").map(String::as_str) == Some("true")
                    && (1..=5).contains(page)
            })
            .times(2)
            .returning(|_, p| Ok(page(p, 4)));

        let request = DiscoverRequest::new("strong", "medium", "any");
        let response = service.discover(Arc::new(mock), &request).await.unwrap();

        assert_eq!(response.results.len(), 8);
    }

    #[tokio::test]
    async fn test_surprise_resolves_then_keys_on_raw_input() {
        // first draw resolves surprise to strong (index 2)
        let (service, _clock) = service(Arc::new(Scripted::new(&[2, 0])));
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .withf(|params, _| {
                params.get("vote_count.gte").map(String::as_str) == Some("60")
            })
            .times(2)
            .returning(|_, p| Ok(page(p, 2)));

        let request = DiscoverRequest::new("surprise", "medium", "any");
        service.discover(Arc::new(mock), &request).await.unwrap();

        let key = CacheKey::discover(&request);
        assert_eq!(key.to_string(), "surprise:medium:any:ja");
        assert!(service.cache().get(&key, Freshness::Fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_fetch_one_entry_survives() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[0])));
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .times(2..=4)
            .returning(|_, p| Ok(page(p, 3)));
        let catalog: Arc<dyn CatalogProvider> = Arc::new(mock);
        let request = DiscoverRequest::default();

        let (a, b) = tokio::join!(
            service.discover(Arc::clone(&catalog), &request),
            service.discover(Arc::clone(&catalog), &request)
        );

        assert_eq!(a.unwrap().results.len(), 6);
        assert_eq!(b.unwrap().results.len(), 6);
        assert_eq!(service.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_values_use_defaults() {
        let (service, _clock) = service(Arc::new(Scripted::new(&[0])));
        let mut mock = MockCatalogProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover_page()
            .withf(|params, page| {
                params.get("vote_count.gte").map(String::as_str) == Some("200")
                    && params.get("with_runtime.gte").map(String::as_str) == Some("91")
                    && !params.contains_key("primary_release_date.gte")
                    && *page <= 2
            })
            .times(2)
            .returning(|_, p| Ok(page(p, 1)));

        let request = DiscoverRequest::new("gore", "epic", "future");
        let response = service.discover(Arc::new(mock), &request).await.unwrap();
        assert_eq!(response.results.len(), 2);
    }
}
