//! Ice cream inventory service: a small CRUD HTTP API over SQLite with
//! Prometheus instrumentation on every request.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::metrics::HttpMetrics;

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub metrics: Arc<HttpMetrics>,
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Ice cream CRUD ──────────────────────────────────────────────────
        .route(
            "/ice_creams",
            get(handlers::ice_creams::list_ice_creams)
                .post(handlers::ice_creams::create_ice_cream),
        )
        .route(
            "/ice_creams/:id",
            put(handlers::ice_creams::update_ice_cream)
                .delete(handlers::ice_creams::delete_ice_cream),
        )

        // ── Metrics exposition ──────────────────────────────────────────────
        .route(metrics::METRICS_PATH, get(metrics::exposition));

    apply_middleware(routes, state)
}

/// Wraps a route set in the service-wide middleware stack.
///
/// CatchPanic sits inside the metrics layer, so a panic reaches the request
/// counters as the 500 it turns into.
pub fn apply_middleware(router: Router<AppState>, state: AppState) -> Router {
    router
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
