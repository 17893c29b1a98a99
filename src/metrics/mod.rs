use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use tracing::warn;

use crate::db;
use crate::error::AppResult;
use crate::AppState;

/// Route of the exposition endpoint, shared with the router so the
/// middleware exclusion below can never drift from the actual route.
pub const METRICS_PATH: &str = "/metrics";

/// Process-wide instruments, registered against a private registry.
///
/// Counters and histograms are internally atomic, so the struct is shared
/// plainly behind an `Arc` in [`AppState`] with no lock around it.
pub struct HttpMetrics {
    registry: Registry,
    pub request_duration: HistogramVec,
    pub request_count: IntCounterVec,
    pub db_connections_active: IntGauge,
    pub ice_cream_count: IntGauge,
    pub error_count: IntCounterVec,
}

impl HttpMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            ),
            &["method", "endpoint", "status"],
        )?;
        let request_count = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
        )?;
        let db_connections_active = IntGauge::new(
            "db_connections_active",
            "Database connections currently checked out of the pool",
        )?;
        let ice_cream_count = IntGauge::new(
            "ice_cream_total_count",
            "Total number of ice creams in database",
        )?;
        let error_count = IntCounterVec::new(
            Opts::new("app_errors_total", "Total number of application errors"),
            &["type"],
        )?;

        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(db_connections_active.clone()))?;
        registry.register(Box::new(ice_cream_count.clone()))?;
        registry.register(Box::new(error_count.clone()))?;

        Ok(Self {
            registry,
            request_duration,
            request_count,
            db_connections_active,
            ice_cream_count,
            error_count,
        })
    }

    pub fn record_error(&self, kind: &str) {
        self.error_count.with_label_values(&[kind]).inc();
    }

    /// Encode every registered family in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Request-timing middleware: observes the duration and counts every request,
/// labeled by method, matched route template and response status. Requests
/// against the exposition endpoint itself are passed through untouched, and a
/// 5xx response is counted as an unhandled error.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    if endpoint == METRICS_PATH {
        return next.run(req).await;
    }

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    let labels = [method.as_str(), endpoint.as_str(), status.as_str()];
    state
        .metrics
        .request_duration
        .with_label_values(&labels)
        .observe(elapsed);
    state.metrics.request_count.with_label_values(&labels).inc();

    if response.status().is_server_error() {
        state.metrics.record_error("http_exception");
    }

    response
}

// ── Exposition endpoint ───────────────────────────────────────────────────────

/// `GET /metrics` — refreshes the gauges, then renders the registry.
///
/// The record count comes from a fresh `COUNT(*)` on every scrape and the
/// connection gauge from live pool statistics. A failed refresh is counted
/// under `app_errors_total{type="metrics_update"}` and logged, but the scrape
/// still answers with whatever the registry holds.
pub async fn exposition(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    match db::count_ice_creams(&state.db).await {
        Ok(count) => state.metrics.ice_cream_count.set(count),
        Err(e) => {
            state.metrics.record_error("metrics_update");
            warn!(error = %e, "Failed to refresh the record count gauge");
        }
    }

    let checked_out = state.db.size() as i64 - state.db.num_idle() as i64;
    state.metrics.db_connections_active.set(checked_out);

    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
