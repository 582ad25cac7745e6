//! TMDB API provider
//!
//! Discovery goes through `/discover/movie`, the detail lookup through
//! `/movie/{id}`. Both authenticate with the v4 read access token as a
//! bearer credential.

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverPage, RawItem, RawMovieDetails},
    services::{providers::CatalogProvider, query::QueryParams},
};
use reqwest::{header::ACCEPT, Client as HttpClient, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    token: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests time out after `timeout`
    pub fn new(
        token: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `{api_url}/movie/{id}` with `id` percent-encoded as one path segment
    fn movie_url(&self, id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid TMDB API URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Internal("TMDB API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["movie", id]);

        Ok(url)
    }

    /// Sends an authenticated request and parses the JSON body
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover_page(&self, params: &QueryParams, page: u32) -> AppResult<Vec<RawItem>> {
        let url = format!("{}/discover/movie", self.api_url);
        let request = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("page", page)]);

        let payload: DiscoverPage = self.fetch_json(request).await?;

        tracing::debug!(
            page = page,
            results = payload.results.len(),
            provider = "tmdb",
            "Discovery page fetched"
        );

        Ok(payload.results)
    }

    async fn movie_details(&self, id: &str, language: &str) -> AppResult<RawMovieDetails> {
        let url = self.movie_url(id)?;
        let request = self.http_client.get(url).query(&[("language", language)]);

        let details: RawMovieDetails = self.fetch_json(request).await?;

        tracing::debug!(
            movie_id = %id,
            language = %language,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider =
            TmdbProvider::new("token", "http://tmdb.test/3/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.api_url, "http://tmdb.test/3");
        assert_eq!(provider.name(), "tmdb");
    }

    #[test]
    fn test_movie_url_keeps_base_path() {
        let provider =
            TmdbProvider::new("token", "https://api.themoviedb.org/3", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            provider.movie_url("694").unwrap().as_str(),
            "https://api.themoviedb.org/3/movie/694"
        );
    }

    #[test]
    fn test_movie_url_encodes_id_as_one_segment() {
        let provider =
            TmdbProvider::new("token", "http://tmdb.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.movie_url("694/credits").unwrap().as_str(),
            "http://tmdb.test/movie/694%2Fcredits"
        );
    }
}
