use axum::{
    extract::{rejection::QueryRejection, Query},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod discover;
pub mod movie;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/discover", get(discover::discover))
        .route("/movie", get(movie::movie))
        .layer(
            ServiceBuilder::new()
                // outermost first: the id must exist before the trace span is made
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET])
                        .allow_origin(Any),
                ),
        )
        .with_state(state)
}

/// Query string as raw pairs, read leniently so handlers can check the
/// credential before looking at any parameter
pub type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Pairs in arrival order. An unreadable query string counts as empty.
pub fn query_pairs(query: QueryPairs) -> Vec<(String, String)> {
    match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring unreadable query string");
            Vec::new()
        }
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
