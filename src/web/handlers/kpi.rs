//! # KPI Handlers

use axum::extract::State;
use axum::Json;

use crate::analytics::KpiReport;
use crate::web::errors::ApiResult;
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Transition KPIs: GET /api/kpi/
///
/// Optional `start_date`/`end_date` window, `case` filter, and a `from`/`to`
/// pair selecting a single edge.
pub async fn get_kpis(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<KpiReport>> {
    Ok(Json(state.service.kpis(&params).await?))
}
