//! # Web API Module
//!
//! Axum-based REST API serving the process mining dashboard.
//!
//! ## Core Components
//!
//! - [`routes`] - route table
//! - [`handlers`] - thin request handlers over the service layer
//! - [`middleware`] - request id tagging
//! - [`extractors`] - multi-valued query extraction
//! - [`errors`] - HTTP error mapping
//! - [`state`] - shared application state

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use errors::{ApiError, ApiResult};
pub use state::AppState;

use axum::extract::Request;
use axum::Router;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the main Axum application with all routes and middleware
pub fn create_app(app_state: AppState) -> Router {
    let request_timeout = Duration::from_millis(app_state.config.web.request_timeout_ms);
    let cors_enabled = app_state.config.web.cors_enabled;

    let mut app = Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id::add_request_id,
        ))
        .layer(TimeoutLayer::new(request_timeout));

    if cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }),
    )
    .with_state(app_state)
}
