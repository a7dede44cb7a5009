//! # Process Store
//!
//! Storage seam for the process mining records.
//!
//! ## Providers
//!
//! - [`PgProcessStore`]: PostgreSQL through a shared `sqlx` pool
//! - [`MemoryProcessStore`]: in-process tables behind a `RwLock`, used by tests
//!
//! Both providers apply the same filters and return rows in the same order,
//! so the service layer does not care which one it talks to.

pub mod memory;
pub mod postgres;

pub use memory::MemoryProcessStore;
pub use postgres::PgProcessStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::constants::ActivityName;
use crate::error::Result;
use crate::models::{Activity, Alert, Bill, Case, NewAlert, OrderItem};
use crate::query::{ActivityFilter, BillFilter, CaseFilter, OrderItemFilter, PageWindow};

/// Read access to the event log plus alert management.
///
/// `window` arguments select a LIMIT/OFFSET slice of the ordered result;
/// `None` returns every matching row.
#[async_trait]
pub trait ProcessStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    async fn count_activities(&self, filter: &ActivityFilter) -> Result<u64>;

    /// Matching activities ordered by case id, timestamp, id
    async fn list_activities(
        &self,
        filter: &ActivityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Activity>>;

    /// Distinct case ids present in the event log, ascending
    async fn activity_case_ids(&self) -> Result<Vec<String>>;

    /// Distinct activity names present in the event log, ascending
    async fn activity_names(&self) -> Result<Vec<ActivityName>>;

    async fn find_case(&self, id: &str) -> Result<Option<Case>>;

    async fn count_cases(&self, filter: &CaseFilter) -> Result<u64>;

    /// Matching cases ordered by id
    async fn list_cases(&self, filter: &CaseFilter, window: Option<PageWindow>)
        -> Result<Vec<Case>>;

    async fn count_order_items(&self, filter: &OrderItemFilter) -> Result<u64>;

    /// Matching order items ordered by id
    async fn list_order_items(
        &self,
        filter: &OrderItemFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderItem>>;

    async fn count_bills(&self, filter: &BillFilter) -> Result<u64>;

    /// Matching bills ordered by id
    async fn list_bills(&self, filter: &BillFilter, window: Option<PageWindow>)
        -> Result<Vec<Bill>>;

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert>;

    async fn find_alert(&self, id: Uuid) -> Result<Option<Alert>>;

    async fn count_alerts(&self) -> Result<u64>;

    /// Alerts newest first
    async fn list_alerts(&self, window: PageWindow) -> Result<Vec<Alert>>;

    /// Returns whether an alert was removed
    async fn delete_alert(&self, id: Uuid) -> Result<bool>;
}
