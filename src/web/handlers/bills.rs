//! # Bill Handlers

use axum::extract::State;
use axum::Json;

use crate::models::Bill;
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Bill listing: GET /api/bills/
pub async fn list_bills(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Bill>>> {
    Ok(Json(state.service.list_bills(&params).await?))
}
