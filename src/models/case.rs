//! # Case Model
//!
//! A single business process instance. Cases own the activities recorded
//! against them and carry the attributes the dashboard filters on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{push_any, push_window, to_count};
use crate::query::{CaseAttributeFilter, CaseFilter, PageWindow};

const CASE_COLUMNS: &str =
    "c.id, c.case_type, c.branch, c.ramo, c.broker, c.state, c.client, c.creator, c.created_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: String,
    #[serde(rename = "type")]
    pub case_type: String,
    pub branch: String,
    pub ramo: String,
    pub broker: String,
    pub state: String,
    pub client: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

impl Case {
    /// Find a case by id
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Case>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(CASE_COLUMNS);
        builder.push(" FROM cases c WHERE c.id = ");
        builder.push_bind(id.to_string());

        builder.build_query_as::<Case>().fetch_optional(pool).await
    }

    /// Count cases matching the filter
    pub async fn count_filtered(pool: &PgPool, filter: &CaseFilter) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM cases c WHERE TRUE");
        Self::push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
        Ok(to_count(count))
    }

    /// List cases matching the filter, ordered by id
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &CaseFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Case>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(CASE_COLUMNS);
        builder.push(" FROM cases c WHERE TRUE");
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY c.id");
        push_window(&mut builder, window);

        builder.build_query_as::<Case>().fetch_all(pool).await
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CaseFilter) {
        push_any(builder, "c.id", &filter.case_ids);
        push_attribute_clauses(builder, &filter.attributes);
    }
}

/// Attribute predicates against a `cases` table aliased as `c`
pub(crate) fn push_attribute_clauses(
    builder: &mut QueryBuilder<'_, Postgres>,
    attributes: &CaseAttributeFilter,
) {
    push_any(builder, "c.case_type", &attributes.case_types);
    push_any(builder, "c.branch", &attributes.branches);
    push_any(builder, "c.ramo", &attributes.ramos);
    push_any(builder, "c.broker", &attributes.brokers);
    push_any(builder, "c.state", &attributes.states);
    push_any(builder, "c.client", &attributes.clients);
    push_any(builder, "c.creator", &attributes.creators);
}
