//! # Activity Model
//!
//! Timestamped events belonging to a case. The activity name is one of the
//! fixed [`ActivityName`] values; rows holding anything else fail to decode.
//!
//! Listings are ordered by case id, then timestamp, then activity id so
//! that pagination is deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::case::push_attribute_clauses;
use super::{push_any, push_flag, push_window, text_column, to_count};
use crate::constants::ActivityName;
use crate::query::{ActivityFilter, PageWindow};

text_column!(ActivityName);

const ACTIVITY_COLUMNS: &str = "a.id, a.case_id, a.name, a.timestamp, a.tpt, a.user_name, \
     a.user_type, a.automatic, a.rework, a.case_index";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "case")]
    pub case_id: String,
    pub name: ActivityName,
    pub timestamp: DateTime<Utc>,
    /// Time spent on the task, in seconds
    pub tpt: f64,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_name")]
    pub user: String,
    pub user_type: String,
    pub automatic: bool,
    pub rework: bool,
    pub case_index: String,
}

impl Activity {
    /// Count activities matching the filter
    pub async fn count_filtered(
        pool: &PgPool,
        filter: &ActivityFilter,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM activities a");
        Self::push_from_and_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
        Ok(to_count(count))
    }

    /// List activities matching the filter in (case id, timestamp, id) order
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &ActivityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(ACTIVITY_COLUMNS);
        builder.push(" FROM activities a");
        Self::push_from_and_filter(&mut builder, filter);
        builder.push(" ORDER BY a.case_id, a.timestamp, a.id");
        push_window(&mut builder, window);

        builder.build_query_as::<Activity>().fetch_all(pool).await
    }

    /// Distinct case ids that have at least one activity, ascending
    pub async fn distinct_case_ids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT case_id FROM activities ORDER BY case_id",
        )
        .fetch_all(pool)
        .await
    }

    /// Distinct activity names present in the log, ascending
    pub async fn distinct_names(pool: &PgPool) -> Result<Vec<ActivityName>, sqlx::Error> {
        sqlx::query_scalar::<_, ActivityName>("SELECT DISTINCT name FROM activities ORDER BY name")
            .fetch_all(pool)
            .await
    }

    fn push_from_and_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ActivityFilter) {
        if filter.needs_case_join() {
            builder.push(" JOIN cases c ON c.id = a.case_id");
        }
        builder.push(" WHERE TRUE");

        push_any(builder, "a.case_id", &filter.case_ids);
        push_any(builder, "a.name", &filter.name_strings());
        push_any(builder, "a.case_index", &filter.case_indexes);
        if let Some(cases) = &filter.variant_cases {
            let cases: Vec<String> = cases.iter().cloned().collect();
            // An empty set must match nothing rather than drop the predicate
            builder.push(" AND a.case_id = ANY(");
            builder.push_bind(cases);
            builder.push(")");
        }
        if let Some(start) = filter.window.start_at() {
            builder.push(" AND a.timestamp >= ");
            builder.push_bind(start);
        }
        if let Some(end) = filter.window.end_before() {
            builder.push(" AND a.timestamp < ");
            builder.push_bind(end);
        }
        push_flag(builder, "a.automatic", filter.automatic);
        push_flag(builder, "a.rework", filter.rework);

        if filter.needs_case_join() {
            push_attribute_clauses(builder, &filter.case_attributes);
        }
    }

    /// Duration since `earlier`, in seconds
    pub fn seconds_since(&self, earlier: DateTime<Utc>) -> f64 {
        (self.timestamp - earlier).num_milliseconds() as f64 / 1000.0
    }
}
