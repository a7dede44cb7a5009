//! # In-Memory Store
//!
//! Thread-safe in-process tables for tests. Filters use the same `matches`
//! predicates the query layer defines, and rows come back in the same order
//! the PostgreSQL store produces.
//!
//! ```rust
//! use process_mining::query::ActivityFilter;
//! use process_mining::{MemoryProcessStore, ProcessStore};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryProcessStore::new();
//! let count = store.count_activities(&ActivityFilter::default()).await.unwrap();
//! assert_eq!(count, 0);
//! # });
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::ProcessStore;
use crate::constants::ActivityName;
use crate::error::Result;
use crate::models::{Activity, Alert, Bill, Case, NewAlert, OrderItem};
use crate::query::{ActivityFilter, BillFilter, CaseFilter, OrderItemFilter, PageWindow};

#[derive(Debug, Default)]
struct Tables {
    cases: BTreeMap<String, Case>,
    activities: Vec<Activity>,
    order_items: Vec<OrderItem>,
    bills: Vec<Bill>,
    alerts: Vec<Alert>,
}

#[derive(Debug, Default)]
pub struct MemoryProcessStore {
    tables: RwLock<Tables>,
}

impl MemoryProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cases(&self, cases: impl IntoIterator<Item = Case>) {
        let mut tables = self.tables.write();
        for case in cases {
            tables.cases.insert(case.id.clone(), case);
        }
    }

    pub fn insert_activities(&self, activities: impl IntoIterator<Item = Activity>) {
        self.tables.write().activities.extend(activities);
    }

    pub fn insert_order_items(&self, items: impl IntoIterator<Item = OrderItem>) {
        self.tables.write().order_items.extend(items);
    }

    pub fn insert_bills(&self, bills: impl IntoIterator<Item = Bill>) {
        self.tables.write().bills.extend(bills);
    }

    pub fn insert_alerts(&self, alerts: impl IntoIterator<Item = Alert>) {
        self.tables.write().alerts.extend(alerts);
    }

    fn matching_activities(&self, filter: &ActivityFilter) -> Vec<Activity> {
        let tables = self.tables.read();
        let mut rows: Vec<Activity> = tables
            .activities
            .iter()
            .filter(|a| filter.matches(a, tables.cases.get(&a.case_id)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.case_id
                .cmp(&b.case_id)
                .then(a.timestamp.cmp(&b.timestamp))
                .then(a.id.cmp(&b.id))
        });
        rows
    }

    fn matching_order_items(&self, filter: &OrderItemFilter) -> Vec<OrderItem> {
        let mut rows: Vec<OrderItem> = self
            .tables
            .read()
            .order_items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        rows.sort_by_key(|item| item.id);
        rows
    }

    fn matching_bills(&self, filter: &BillFilter) -> Vec<Bill> {
        let mut rows: Vec<Bill> = self
            .tables
            .read()
            .bills
            .iter()
            .filter(|bill| filter.matches(bill))
            .cloned()
            .collect();
        rows.sort_by_key(|bill| bill.id);
        rows
    }

    fn matching_cases(&self, filter: &CaseFilter) -> Vec<Case> {
        // BTreeMap iteration is already ordered by id
        self.tables
            .read()
            .cases
            .values()
            .filter(|case| filter.matches(case))
            .cloned()
            .collect()
    }
}

fn apply_window<T>(rows: Vec<T>, window: Option<PageWindow>) -> Vec<T> {
    match window {
        None => rows,
        Some(window) => rows
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .collect(),
    }
}

#[async_trait]
impl ProcessStore for MemoryProcessStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn count_activities(&self, filter: &ActivityFilter) -> Result<u64> {
        Ok(self.matching_activities(filter).len() as u64)
    }

    async fn list_activities(
        &self,
        filter: &ActivityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Activity>> {
        Ok(apply_window(self.matching_activities(filter), window))
    }

    async fn activity_case_ids(&self) -> Result<Vec<String>> {
        let ids: BTreeSet<String> = self
            .tables
            .read()
            .activities
            .iter()
            .map(|a| a.case_id.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn activity_names(&self) -> Result<Vec<ActivityName>> {
        let names: BTreeSet<&'static str> = self
            .tables
            .read()
            .activities
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        // Text order, matching ORDER BY on the name column
        Ok(names
            .into_iter()
            .filter_map(|name| name.parse().ok())
            .collect())
    }

    async fn find_case(&self, id: &str) -> Result<Option<Case>> {
        Ok(self.tables.read().cases.get(id).cloned())
    }

    async fn count_cases(&self, filter: &CaseFilter) -> Result<u64> {
        Ok(self.matching_cases(filter).len() as u64)
    }

    async fn list_cases(
        &self,
        filter: &CaseFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Case>> {
        Ok(apply_window(self.matching_cases(filter), window))
    }

    async fn count_order_items(&self, filter: &OrderItemFilter) -> Result<u64> {
        Ok(self.matching_order_items(filter).len() as u64)
    }

    async fn list_order_items(
        &self,
        filter: &OrderItemFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderItem>> {
        Ok(apply_window(self.matching_order_items(filter), window))
    }

    async fn count_bills(&self, filter: &BillFilter) -> Result<u64> {
        Ok(self.matching_bills(filter).len() as u64)
    }

    async fn list_bills(
        &self,
        filter: &BillFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Bill>> {
        Ok(apply_window(self.matching_bills(filter), window))
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert> {
        let alert = alert.into_alert();
        self.tables.write().alerts.push(alert.clone());
        Ok(alert)
    }

    async fn find_alert(&self, id: Uuid) -> Result<Option<Alert>> {
        Ok(self
            .tables
            .read()
            .alerts
            .iter()
            .find(|alert| alert.id == id)
            .cloned())
    }

    async fn count_alerts(&self) -> Result<u64> {
        Ok(self.tables.read().alerts.len() as u64)
    }

    async fn list_alerts(&self, window: PageWindow) -> Result<Vec<Alert>> {
        let mut alerts = self.tables.read().alerts.clone();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(apply_window(alerts, Some(window)))
    }

    async fn delete_alert(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.alerts.len();
        tables.alerts.retain(|alert| alert.id != id);
        Ok(tables.alerts.len() < before)
    }
}
