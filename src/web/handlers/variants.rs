//! # Variant Handlers

use axum::extract::State;
use axum::Json;

use crate::analytics::Variant;
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Variant listing: GET /api/variant/
///
/// Parameters: `mode` (`distinct`, `consecutive`, `full`), `case`,
/// `activities`. Paginated.
pub async fn list_variants(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Variant>>> {
    Ok(Json(state.service.list_variants(&params).await?))
}
