//! # PostgreSQL Store
//!
//! Delegates to the model query functions over a shared connection pool.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ProcessStore;
use crate::constants::ActivityName;
use crate::error::Result;
use crate::models::{Activity, Alert, Bill, Case, NewAlert, OrderItem};
use crate::query::{ActivityFilter, BillFilter, CaseFilter, OrderItemFilter, PageWindow};

#[derive(Debug, Clone)]
pub struct PgProcessStore {
    pool: PgPool,
}

impl PgProcessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessStore for PgProcessStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_activities(&self, filter: &ActivityFilter) -> Result<u64> {
        Ok(Activity::count_filtered(&self.pool, filter).await?)
    }

    async fn list_activities(
        &self,
        filter: &ActivityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Activity>> {
        Ok(Activity::list_filtered(&self.pool, filter, window).await?)
    }

    async fn activity_case_ids(&self) -> Result<Vec<String>> {
        Ok(Activity::distinct_case_ids(&self.pool).await?)
    }

    async fn activity_names(&self) -> Result<Vec<ActivityName>> {
        Ok(Activity::distinct_names(&self.pool).await?)
    }

    async fn find_case(&self, id: &str) -> Result<Option<Case>> {
        Ok(Case::find_by_id(&self.pool, id).await?)
    }

    async fn count_cases(&self, filter: &CaseFilter) -> Result<u64> {
        Ok(Case::count_filtered(&self.pool, filter).await?)
    }

    async fn list_cases(
        &self,
        filter: &CaseFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Case>> {
        Ok(Case::list_filtered(&self.pool, filter, window).await?)
    }

    async fn count_order_items(&self, filter: &OrderItemFilter) -> Result<u64> {
        Ok(OrderItem::count_filtered(&self.pool, filter).await?)
    }

    async fn list_order_items(
        &self,
        filter: &OrderItemFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderItem>> {
        Ok(OrderItem::list_filtered(&self.pool, filter, window).await?)
    }

    async fn count_bills(&self, filter: &BillFilter) -> Result<u64> {
        Ok(Bill::count_filtered(&self.pool, filter).await?)
    }

    async fn list_bills(
        &self,
        filter: &BillFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Bill>> {
        Ok(Bill::list_filtered(&self.pool, filter, window).await?)
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert> {
        Ok(Alert::create(&self.pool, alert).await?)
    }

    async fn find_alert(&self, id: Uuid) -> Result<Option<Alert>> {
        Ok(Alert::find_by_id(&self.pool, id).await?)
    }

    async fn count_alerts(&self) -> Result<u64> {
        Ok(Alert::count(&self.pool).await?)
    }

    async fn list_alerts(&self, window: PageWindow) -> Result<Vec<Alert>> {
        Ok(Alert::list(&self.pool, window).await?)
    }

    async fn delete_alert(&self, id: Uuid) -> Result<bool> {
        Ok(Alert::delete(&self.pool, id).await?)
    }
}
