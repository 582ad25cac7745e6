use crate::{
    error::{AppError, AppResult},
    models::{Locale, MovieDetails},
    services::providers::CatalogProvider,
};

/// Checks the `id` query value of a detail lookup.
///
/// Only a missing or blank id is rejected. Any other value is passed on and
/// an id TMDB does not know fails upstream.
pub fn validate_movie_id(id: Option<&str>) -> AppResult<&str> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Movie id is required.".to_string()))
}

/// Looks up runtime, overview and title for one movie.
///
/// The overview falls back to English when the requested locale has none.
/// Upstream failures are logged and collapsed into
/// [`AppError::DetailsUnavailable`].
pub async fn fetch_movie_details(
    catalog: &dyn CatalogProvider,
    id: &str,
    locale: Locale,
) -> AppResult<MovieDetails> {
    let primary = catalog
        .movie_details(id, locale.language_code())
        .await
        .map_err(|e| details_unavailable(id, e))?;

    let mut overview = primary.overview_text().map(str::to_string);

    if overview.is_none() && locale != Locale::En {
        tracing::debug!(movie_id = %id, locale = ?locale, "Empty overview, falling back to English");
        let fallback = catalog
            .movie_details(id, Locale::En.language_code())
            .await
            .map_err(|e| details_unavailable(id, e))?;
        overview = fallback.overview_text().map(str::to_string);
    }

    Ok(MovieDetails {
        runtime: primary.runtime,
        overview,
        title: primary.title.or(primary.name),
    })
}

fn details_unavailable(id: &str, error: AppError) -> AppError {
    tracing::error!(movie_id = %id, error = %error, "Movie details lookup failed");
    AppError::DetailsUnavailable
}
