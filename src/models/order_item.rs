//! # Order Item Model
//!
//! Purchase order lines. An item is "free text" when it was ordered without
//! a catalog material reference. Only catalog items can be ordered against
//! a contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{push_any, push_flag, push_window, to_count};
use crate::query::{OrderItemFilter, PageWindow};

const ORDER_ITEM_COLUMNS: &str = "o.id, o.order_id, o.material_code, o.description, o.free_text, \
     o.quantity, o.unit_price, o.branch, o.order_date, o.contract_used";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    #[serde(rename = "order")]
    pub order_id: String,
    pub material_code: String,
    pub description: String,
    pub free_text: bool,
    pub quantity: f64,
    pub unit_price: f64,
    pub branch: String,
    pub order_date: DateTime<Utc>,
    pub contract_used: bool,
}

impl OrderItem {
    pub async fn count_filtered(
        pool: &PgPool,
        filter: &OrderItemFilter,
    ) -> Result<u64, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM order_items o WHERE TRUE");
        Self::push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
        Ok(to_count(count))
    }

    /// List order items matching the filter, ordered by id
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &OrderItemFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(ORDER_ITEM_COLUMNS);
        builder.push(" FROM order_items o WHERE TRUE");
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY o.id");
        push_window(&mut builder, window);

        builder.build_query_as::<OrderItem>().fetch_all(pool).await
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderItemFilter) {
        push_flag(builder, "o.free_text", filter.free_text);
        push_any(builder, "o.material_code", &filter.material_codes);
        push_any(builder, "o.branch", &filter.branches);
        push_any(builder, "o.order_id", &filter.order_ids);
        if let Some(start) = filter.window.start_at() {
            builder.push(" AND o.order_date >= ");
            builder.push_bind(start);
        }
        if let Some(end) = filter.window.end_before() {
            builder.push(" AND o.order_date < ");
            builder.push_bind(end);
        }
    }

    pub fn net_value(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Catalog items have a framework contract to order against
    pub fn contract_available(&self) -> bool {
        !self.free_text
    }

    pub fn uses_contract(&self) -> bool {
        self.contract_available() && self.contract_used
    }
}
