//! # Activity Handlers

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::models::Activity;
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Filtered activity listing: GET /api/activity/
///
/// Filters: `case`, `name`, `case_index`, `type`, `branch`, `ramo`,
/// `broker`/`brocker`, `state`, `client`, `creator`, `var` (with `mode`),
/// `start_date`, `end_date`, `automatic`, `rework`. Paginated.
pub async fn list_activities(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Activity>>> {
    debug!(path = params.path(), "Listing activities");
    Ok(Json(state.service.list_activities(&params).await?))
}
