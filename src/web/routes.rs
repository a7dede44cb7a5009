//! # Web API Route Definitions
//!
//! Dashboard routes live under `/api` and keep the trailing slashes the
//! front end already calls. Health probes sit at the root.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Dashboard API routes, nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Event log
        .route("/activity/", get(handlers::activities::list_activities))
        .route("/variant/", get(handlers::variants::list_variants))
        .route("/kpi/", get(handlers::kpi::get_kpis))
        .route("/metadata/", get(handlers::cases::get_metadata))
        // Cases
        .route("/cases/", get(handlers::cases::list_cases))
        .route("/cases/{id}", get(handlers::cases::get_case))
        .route("/case/", get(handlers::cases::get_case_timeline))
        .route("/case-explorer/", get(handlers::cases::case_explorer))
        // Reworks
        .route("/reworks/", get(handlers::reworks::list_reworks))
        .route("/reworks/summary", get(handlers::reworks::rework_summary))
        // Purchasing
        .route("/order-items/", get(handlers::order_items::list_order_items))
        .route(
            "/order-items/free-text-summary",
            get(handlers::order_items::free_text_summary),
        )
        .route(
            "/order-items/contract-usage",
            get(handlers::order_items::contract_usage),
        )
        .route(
            "/order-items/contract-usage/branches",
            get(handlers::order_items::contract_usage_by_branch),
        )
        .route("/bills/", get(handlers::bills::list_bills))
        // Alerts
        .route(
            "/alerts/",
            get(handlers::alerts::list_alerts).post(handlers::alerts::create_alert),
        )
        .route(
            "/alerts/{id}",
            get(handlers::alerts::get_alert).delete(handlers::alerts::delete_alert),
        )
        // Assistant
        .route("/assistant/", post(handlers::assistant::ask_assistant))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::basic_health))
        .route("/health/ready", get(handlers::health::readiness_probe))
}
