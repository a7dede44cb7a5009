//! # Order Item Handlers

use axum::extract::State;
use axum::Json;

use crate::analytics::{BranchUsage, ContractUsageKpi, FreeTextSummary};
use crate::models::OrderItem;
use crate::query::Page;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Order item listing: GET /api/order-items/
///
/// Filters: `free_text`, `material_code`, `branch`, `order`,
/// `start_date`/`end_date` on the order date. Paginated.
pub async fn list_order_items(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<OrderItem>>> {
    Ok(Json(state.service.list_order_items(&params).await?))
}

/// Free-text versus catalog ordering: GET /api/order-items/free-text-summary
pub async fn free_text_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<FreeTextSummary>> {
    Ok(Json(state.service.free_text_summary(&params).await?))
}

/// Contract usage, current and previous period: GET /api/order-items/contract-usage
///
/// Takes the order item filters. The previous period is only reported when
/// both `start_date` and `end_date` are given.
pub async fn contract_usage(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<ContractUsageKpi>> {
    Ok(Json(state.service.contract_usage(&params).await?))
}

/// Contract usage per branch: GET /api/order-items/contract-usage/branches
pub async fn contract_usage_by_branch(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Vec<BranchUsage>>> {
    Ok(Json(state.service.contract_usage_by_branch(&params).await?))
}
