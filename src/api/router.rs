//! Route table. Returns a composable `Router` so tests can drive the full
//! service surface with `tower::ServiceExt::oneshot`, no socket needed.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config;

/// Build the service router around a ready `ApiContext`.
pub fn extraction_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/extract", post(endpoints::extract::extract))
        .route(
            "/extract_batch",
            post(endpoints::extract_batch::extract_batch),
        )
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(config::MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
