use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{DiscoverRequest, DiscoverResponse},
    routes::{query_pairs, AppState, QueryPairs},
};

/// Handler for the discovery endpoint
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: QueryPairs,
) -> AppResult<Json<DiscoverResponse>> {
    let catalog = state.catalog()?;
    let request = DiscoverRequest::from_pairs(&query_pairs(query));

    tracing::info!(
        request_id = %request_id,
        scare = %request.scare,
        runtime = %request.runtime,
        era = %request.era,
        locale = %request.locale,
        "Processing discovery request"
    );

    let response = state.discovery.discover(catalog, &request).await?;

    tracing::info!(
        request_id = %request_id,
        results = response.results.len(),
        cached = response.cached,
        stale = response.stale,
        "Discovery completed"
    );

    Ok(Json(response))
}
