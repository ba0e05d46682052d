//! Axum router configuration with middleware.
//!
//! The relay has one routed POST endpoint plus a health check.
//! Middleware: CORS (built from the configured origin allow-list), tracing.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use parley_types::config::AccessConfig;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete relay router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.access);

    Router::new()
        .route("/", post(handlers::dispatch))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer mirroring the origin allow-list.
///
/// The dispatch handler still checks the origin itself -- CORS is a
/// browser-side fence, not the access decision.
fn cors_layer(access: &AccessConfig) -> CorsLayer {
    let origin = if access.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let access = access.clone();
        AllowOrigin::predicate(move |value: &HeaderValue, _| {
            value
                .to_str()
                .map(|origin| access.origin_allowed(origin))
                .unwrap_or(false)
        })
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_headers(Any)
}

/// GET /health - Simple health check endpoint (no gating).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
