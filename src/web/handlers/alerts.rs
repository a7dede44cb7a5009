//! # Alert Handlers
//!
//! Create, list, fetch and delete dashboard alerts.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Alert, AlertSeverity, AlertState, NewAlert};
use crate::query::Page;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::extractors::ApiQuery;
use crate::web::state::AppState;

/// Body of POST /api/alerts/
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlertRequest {
    pub message: String,
    pub severity: Option<String>,
    pub state: Option<String>,
}

impl CreateAlertRequest {
    pub fn validate(self) -> ApiResult<NewAlert> {
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(ApiError::bad_request("Alert message cannot be empty"));
        }

        let severity = match self.severity.as_deref() {
            None => AlertSeverity::default(),
            Some(raw) => raw.parse().map_err(ApiError::bad_request)?,
        };
        let state = match self.state.as_deref() {
            None => AlertState::default(),
            Some(raw) => raw.parse().map_err(ApiError::bad_request)?,
        };

        Ok(NewAlert {
            message,
            severity,
            state,
        })
    }
}

fn parse_alert_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid alert id: {raw}")))
}

/// Create an alert: POST /api/alerts/
pub async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let Json(request) = payload?;
    let new_alert = request.validate()?;

    let alert = state.service.create_alert(new_alert).await?;
    info!(alert_id = %alert.id, severity = %alert.severity, "Alert created via web API");

    Ok((StatusCode::CREATED, Json(alert)))
}

/// Alerts newest first: GET /api/alerts/
pub async fn list_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery,
) -> ApiResult<Json<Page<Alert>>> {
    Ok(Json(state.service.list_alerts(&params).await?))
}

/// Single alert: GET /api/alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alert>> {
    let id = parse_alert_id(&id)?;
    Ok(Json(state.service.get_alert(id).await?))
}

/// Delete an alert: DELETE /api/alerts/{id}
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_alert_id(&id)?;
    state.service.delete_alert(id).await?;
    info!(alert_id = %id, "Alert deleted via web API");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str, severity: Option<&str>, state: Option<&str>) -> CreateAlertRequest {
        CreateAlertRequest {
            message: message.to_string(),
            severity: severity.map(str::to_string),
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_apply() {
        let alert = request("late bills", None, None).validate().unwrap();
        assert_eq!(alert.severity, AlertSeverity::Info);
        assert_eq!(alert.state, AlertState::Open);
    }

    #[test]
    fn test_invalid_values_are_bad_requests() {
        assert!(request("  ", None, None).validate().is_err());
        assert!(request("x", Some("loud"), None).validate().is_err());
        assert!(request("x", None, Some("gone")).validate().is_err());
    }

    #[test]
    fn test_alert_id_must_be_uuid() {
        assert!(parse_alert_id("not-a-uuid").is_err());
        assert!(parse_alert_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
