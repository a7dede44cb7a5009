//! # Rework Handlers

use axum::extract::State;
use axum::Json;

use crate::analytics::{Rework, ReworkSummary};
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Derived reworks: GET /api/reworks/
pub async fn list_reworks(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Rework>>> {
    Ok(Json(state.service.list_reworks(&params).await?))
}

/// Rework rate and status: GET /api/reworks/summary
pub async fn rework_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<ReworkSummary>> {
    Ok(Json(state.service.rework_summary(&params).await?))
}
