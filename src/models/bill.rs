//! # Bill Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{push_any, push_flag, push_window, to_count};
use crate::query::{BillFilter, PageWindow};

/// Invoice issued against a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub id: i64,
    #[serde(rename = "case")]
    pub case_id: String,
    pub amount: f64,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub paid: bool,
}

impl Bill {
    pub async fn count_filtered(pool: &PgPool, filter: &BillFilter) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM bills b WHERE TRUE");
        Self::push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
        Ok(to_count(count))
    }

    pub async fn list_filtered(
        pool: &PgPool,
        filter: &BillFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Bill>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT b.id, b.case_id, b.amount, b.currency, b.issued_at, b.paid FROM bills b WHERE TRUE",
        );
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY b.id");
        push_window(&mut builder, window);

        builder.build_query_as::<Bill>().fetch_all(pool).await
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BillFilter) {
        push_any(builder, "b.case_id", &filter.case_ids);
        push_flag(builder, "b.paid", filter.paid);
    }
}
