//! # Alert Model
//!
//! Dashboard alerts. Alerts are the only records the API writes; everything
//! else is read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{text_column, to_count};
use crate::query::PageWindow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            _ => Err(format!(
                "Invalid alert severity: {s}. Use info, warning or critical"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    #[default]
    Open,
    Acknowledged,
    Resolved,
}

impl AlertState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "acknowledged" => Ok(Self::Acknowledged),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!(
                "Invalid alert state: {s}. Use open, acknowledged or resolved"
            )),
        }
    }
}

text_column!(AlertSeverity);
text_column!(AlertState);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub message: String,
    pub severity: AlertSeverity,
    pub state: AlertState,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an alert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub message: String,
    pub severity: AlertSeverity,
    pub state: AlertState,
}

impl NewAlert {
    /// Materialize the alert with a fresh id and creation time
    pub fn into_alert(self) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            message: self.message,
            severity: self.severity,
            state: self.state,
            created_at: Utc::now(),
        }
    }
}

impl Alert {
    /// Insert a new alert and return the stored row
    pub async fn create(pool: &PgPool, new_alert: NewAlert) -> Result<Alert, sqlx::Error> {
        let alert = new_alert.into_alert();

        sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (id, message, severity, state, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, message, severity, state, created_at
            "#,
        )
        .bind(alert.id)
        .bind(&alert.message)
        .bind(alert.severity.as_str())
        .bind(alert.state.as_str())
        .bind(alert.created_at)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Alert>, sqlx::Error> {
        sqlx::query_as::<_, Alert>(
            "SELECT id, message, severity, state, created_at FROM alerts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(pool)
            .await?;
        Ok(to_count(count))
    }

    /// List alerts newest first
    pub async fn list(pool: &PgPool, window: PageWindow) -> Result<Vec<Alert>, sqlx::Error> {
        sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, message, severity, state, created_at
            FROM alerts
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await
    }

    /// Delete an alert, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
