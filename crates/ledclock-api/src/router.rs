//! Axum router construction for the control API.
//!
//! Assembles all routes into a single [`Router`] with panic catching,
//! CORS, and request tracing.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML control page
/// - `GET /api/time` -- clock snapshot
/// - `POST /api/start`, `POST /api/stop` -- display on/off
/// - `GET|POST /api/timezone` -- read / change the zone
/// - `GET|POST /api/hour_mode` -- read / change the hour mode
///
/// CORS allows any origin so a front end served elsewhere on the LAN can
/// drive the clock.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        // Control page
        .route("/", get(handlers::index))
        // Clock
        .route("/api/time", get(handlers::get_time))
        .route("/api/start", post(handlers::start))
        .route("/api/stop", post(handlers::stop))
        // Settings
        .route(
            "/api/timezone",
            get(handlers::get_timezone).post(handlers::set_timezone),
        )
        .route(
            "/api/hour_mode",
            get(handlers::get_hour_mode).post(handlers::set_hour_mode),
        )
        .with_state(state);

    with_middleware(routes)
}

/// Wrap `router` in the middleware stack every API route runs behind:
/// panic catching, CORS, and request tracing.
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
