//! HTTP route handlers.
//!
//! Routes are grouped by caching behaviour. The scan status check is never
//! cached since the answer changes once GuardDuty finishes; the greeting gets a
//! short public max-age. Every response allows any origin.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod scan;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HOME, CACHE_CONTROL_SCAN_STATUS};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path of the scan status endpoint
pub const SCAN_STATUS_PATH: &str = "/api/check-scan-status";

/// Creates the Axum router with all routes, cache headers and CORS.
pub fn create_router(state: AppState) -> Router {
    // Scan status - must always hit the object store
    let api_routes = Router::new()
        .route(SCAN_STATUS_PATH, get(scan::check_scan_status))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_SCAN_STATUS),
        ));

    // Greeting - static text
    let home_routes = Router::new().route("/", get(home::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HOME),
        ),
    );

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(api_routes)
        .merge(home_routes)
        .merge(health_routes)
        .with_state(state)
        // Any origin may call the API
        .layer(CorsLayer::permissive())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
