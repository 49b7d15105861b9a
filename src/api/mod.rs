//! HTTP surface: route table and middleware.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::handlers::AppState;

// Thin namespace wrapper for the request handlers
pub mod handlers {
    pub use crate::handlers::*;
}

/// Maximum accepted form body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the application router.
///
/// `/getAddressDetails` answers every method; non-POST requests get the
/// "Request method not allowed." body instead of a bare framework 405.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_page))
        .route("/health", get(handlers::health))
        .route(
            "/getAddressDetails",
            post(handlers::get_address_details).fallback(handlers::method_not_allowed),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
