// Library crate for Aran API Sentinel
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod store;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    detect_anomalies, discover_apis, get_document_file, list_catalog, list_companies,
    list_documents, login, upload_document,
};
use crate::middlewares::backend_token_middleware;
use crate::state::AppState;

/// Room for multipart boundaries and metadata fields on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a backend session token)
    let protected_routes = Router::new()
        // Catalog routes
        .route("/api/catalog/apis", get(list_catalog))
        .route("/api/companies", get(list_companies))
        // AI routes
        .route("/api/ai/anomalies", post(detect_anomalies))
        .route("/api/ai/discovery", post(discover_apis))
        .route_layer(middleware::from_fn(backend_token_middleware));

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(|| async { "Hello, Aran API Sentinel!" }))
        // Public auth routes
        .route("/api/auth/login", post(login))
        // Document routes
        .route(
            "/api/documents",
            get(list_documents).post(upload_document).layer(upload_limit),
        )
        .route("/api/files", get(get_document_file))
        // Protected routes
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
