//! # Case Handlers
//!
//! Case listing and lookup, the case explorer, single-case timelines and the
//! filter metadata.

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::analytics::{CaseSummary, Metadata, TimelineEntry};
use crate::models::Case;
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Case listing: GET /api/cases/
pub async fn list_cases(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Case>>> {
    Ok(Json(state.service.list_cases(&params).await?))
}

/// Single case: GET /api/cases/{id}
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Case>> {
    debug!(case_id = %id, "Fetching case");
    Ok(Json(state.service.get_case(&id).await?))
}

/// Timeline of one case: GET /api/case/?id=
pub async fn get_case_timeline(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Vec<TimelineEntry>>> {
    Ok(Json(state.service.case_timeline(&params).await?))
}

/// Per-case summaries: GET /api/case-explorer/
pub async fn case_explorer(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<CaseSummary>>> {
    Ok(Json(state.service.case_explorer(&params).await?))
}

/// Distinct case ids and activity names: GET /api/metadata/
pub async fn get_metadata(State(state): State<AppState>) -> ApiResult<Json<Metadata>> {
    Ok(Json(state.service.metadata().await?))
}
