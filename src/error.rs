use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The upstream bearer credential is not configured
    #[error("TMDB token is missing.")]
    MissingCredential,

    #[error("{0}")]
    InvalidInput(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Discovery fetch failed and no usable stale entry was cached
    #[error("Failed to load movies from TMDB.")]
    DiscoveryUnavailable,

    #[error("Failed to load movie details.")]
    DetailsUnavailable,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error originated at the upstream catalog
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::HttpClient(_) | AppError::ExternalApi(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingCredential
            | AppError::DiscoveryUnavailable
            | AppError::DetailsUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            // Upstream detail stays in the logs
            AppError::HttpClient(_) | AppError::ExternalApi(_) => {
                tracing::error!(error = %self, "Unhandled upstream error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed.".to_string(),
                )
            }
            AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
