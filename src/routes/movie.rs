use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{query_value, Locale, MovieDetails},
    routes::{query_pairs, AppState, QueryPairs},
    services::movie_details,
};

/// Handler for the movie detail endpoint
pub async fn movie(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: QueryPairs,
) -> AppResult<Json<MovieDetails>> {
    let catalog = state.catalog()?;
    let pairs = query_pairs(query);
    let raw_id = query_value(&pairs, "id");
    let id = movie_details::validate_movie_id(raw_id.as_deref())?;
    let locale = Locale::parse(query_value(&pairs, "locale").as_deref().unwrap_or("ja"));

    tracing::info!(request_id = %request_id, movie_id = %id, locale = ?locale, "Processing movie request");

    let details = movie_details::fetch_movie_details(catalog.as_ref(), id, locale).await?;

    Ok(Json(details))
}
