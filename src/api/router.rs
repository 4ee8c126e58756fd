//! API router.
//!
//! Returns a composable `Router` with all routes nested under `/api/`.
//! Authentication happens upstream; the owner identity arrives as a
//! trusted `X-User-Id` header.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Uploads above this size are rejected before extraction.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/documents/upload", post(endpoints::documents::upload))
        .route("/documents", get(endpoints::documents::list))
        .route("/documents/stats", get(endpoints::documents::stats))
        .route("/documents/:id", get(endpoints::documents::detail))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
}
