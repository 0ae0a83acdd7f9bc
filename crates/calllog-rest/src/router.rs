//! Router assembly.

use crate::context::request_context_middleware;
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Wraps application routes with the request-context and trace layers.
///
/// Every handler reachable through the returned router can be intercepted.
pub fn create_router(routes: Router) -> Router {
    let router = routes
        .route("/health", get(health))
        .layer(middleware::from_fn(request_context_middleware))
        .layer(TraceLayer::new_for_http());

    info!("Router created with request context layer");
    router
}

async fn health() -> &'static str {
    "ok"
}
