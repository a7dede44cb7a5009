//! # Process Mining Service
//!
//! Business logic behind the dashboard endpoints. Handlers hand over the
//! decoded query string; this service builds filters, talks to the store,
//! runs the aggregations and paginates the result.
//!
//! Listings that map directly onto a table (activities, cases, order items,
//! bills, alerts) are counted and sliced in the store. Derived listings
//! (variants, case summaries, reworks) are computed over the full matching
//! activity set and sliced afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::analytics::{
    assign_global_ids, branch_usage, build_traces, case_timeline, compute_kpis, compute_variants,
    detect_reworks, summarize_cases, summarize_reworks, BranchUsage, CaseSummary,
    ContractUsageKpi, FreeTextSummary, KpiReport, Metadata, Rework, ReworkSummary, SequenceMode,
    TimelineEntry, Variant,
};
use crate::config::PaginationConfig;
use crate::constants::ActivityName;
use crate::error::{ProcessMiningError, Result};
use crate::models::{Activity, Alert, Bill, Case, NewAlert, OrderItem};
use crate::query::{
    ActivityFilter, BillFilter, CaseFilter, DateWindow, OrderItemFilter, Page, PageLinks,
    PageRequest, QueryParams,
};
use crate::store::ProcessStore;

#[derive(Debug, Clone)]
pub struct ProcessMiningService {
    store: Arc<dyn ProcessStore>,
    pagination: PaginationConfig,
    public_base_url: Option<String>,
}

impl ProcessMiningService {
    pub fn new(
        store: Arc<dyn ProcessStore>,
        pagination: PaginationConfig,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            store,
            pagination,
            public_base_url,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProcessStore> {
        &self.store
    }

    fn page_request(&self, params: &QueryParams) -> Result<PageRequest> {
        PageRequest::from_params(params, &self.pagination)
    }

    fn links(&self, params: &QueryParams) -> PageLinks {
        PageLinks::new(self.public_base_url.as_deref(), params)
    }

    fn sequence_mode(params: &QueryParams) -> Result<SequenceMode> {
        Ok(params
            .parsed_one::<SequenceMode>("mode")?
            .unwrap_or_default())
    }

    /// Check that the store is reachable
    pub async fn readiness(&self) -> Result<()> {
        self.store.ping().await
    }

    // Activities

    /// Filtered, paginated activities: GET /api/activity/
    pub async fn list_activities(&self, params: &QueryParams) -> Result<Page<Activity>> {
        let request = self.page_request(params)?;
        let mut filter = ActivityFilter::from_params(params)?;
        self.resolve_variants(&mut filter, Self::sequence_mode(params)?)
            .await?;

        let count = self.store.count_activities(&filter).await?;
        request.ensure_in_range(count)?;
        let results = self
            .store
            .list_activities(&filter, Some(request.window()))
            .await?;

        debug!(
            count = count,
            page = request.page,
            returned = results.len(),
            "Listed activities"
        );
        Ok(Page::new(results, count, &request, &self.links(params)))
    }

    /// Turn requested variant ids into the set of case ids they cover.
    ///
    /// Ids refer to the unfiltered variant listing; unknown ids cover nothing.
    async fn resolve_variants(&self, filter: &mut ActivityFilter, mode: SequenceMode) -> Result<()> {
        if !filter.needs_variant_resolution() {
            return Ok(());
        }

        let requested: BTreeSet<u64> = filter.variant_ids.iter().copied().collect();
        let cases: BTreeSet<String> = self
            .global_variants(mode)
            .await?
            .into_iter()
            .filter(|variant| requested.contains(&variant.id))
            .flat_map(|variant| variant.cases)
            .collect();

        debug!(
            variants = ?filter.variant_ids,
            cases = cases.len(),
            "Resolved variant filter"
        );
        filter.variant_cases = Some(cases);
        Ok(())
    }

    async fn all_activities(&self) -> Result<Vec<Activity>> {
        self.store
            .list_activities(&ActivityFilter::default(), None)
            .await
    }

    async fn global_variants(&self, mode: SequenceMode) -> Result<Vec<Variant>> {
        let activities = self.all_activities().await?;
        Ok(compute_variants(&build_traces(&activities), mode))
    }

    // Variants

    /// Variant listing: GET /api/variant/
    ///
    /// `case` narrows the case population and `activities` keeps cases whose
    /// trace contains every listed activity. Percentages are relative to the
    /// narrowed population; ids stay those of the unfiltered listing.
    pub async fn list_variants(&self, params: &QueryParams) -> Result<Page<Variant>> {
        let request = self.page_request(params)?;
        let mode = Self::sequence_mode(params)?;
        let case_ids = params.strings("case");
        let required: Vec<ActivityName> = params.parsed("activities")?;

        let traces = build_traces(&self.all_activities().await?);
        let global = compute_variants(&traces, mode);

        let variants = if case_ids.is_empty() && required.is_empty() {
            global
        } else {
            let selected: Vec<_> = traces
                .into_iter()
                .filter(|t| case_ids.is_empty() || case_ids.contains(&t.case_id))
                .filter(|t| t.contains_all(&required))
                .collect();
            let mut filtered = compute_variants(&selected, mode);
            assign_global_ids(&mut filtered, &global);
            filtered
        };

        debug!(mode = %mode, variants = variants.len(), "Computed variants");
        Page::from_all(variants, &request, &self.links(params))
    }

    // KPIs

    /// Transition KPIs: GET /api/kpi/
    pub async fn kpis(&self, params: &QueryParams) -> Result<KpiReport> {
        let window = DateWindow::from_params(params)?;
        let from = params.parsed_one::<ActivityName>("from")?;
        let to = params.parsed_one::<ActivityName>("to")?;

        let edge = match (from, to) {
            (Some(from), Some(to)) => Some((from, to)),
            (None, None) => None,
            _ => {
                return Err(ProcessMiningError::validation(
                    "Both 'from' and 'to' are required to select an edge",
                ))
            }
        };

        let filter = ActivityFilter {
            case_ids: params.strings("case"),
            window,
            ..ActivityFilter::default()
        };
        let activities = self.store.list_activities(&filter, None).await?;

        Ok(compute_kpis(&activities, edge))
    }

    // Cases

    /// Case listing: GET /api/cases/
    pub async fn list_cases(&self, params: &QueryParams) -> Result<Page<Case>> {
        let request = self.page_request(params)?;
        let filter = CaseFilter::from_params(params);

        let count = self.store.count_cases(&filter).await?;
        request.ensure_in_range(count)?;
        let results = self.store.list_cases(&filter, Some(request.window())).await?;

        Ok(Page::new(results, count, &request, &self.links(params)))
    }

    /// Single case: GET /api/cases/{id}
    pub async fn get_case(&self, id: &str) -> Result<Case> {
        self.store
            .find_case(id)
            .await?
            .ok_or_else(|| ProcessMiningError::not_found(format!("Case {id} not found")))
    }

    /// Timeline of one case: GET /api/case/?id=
    pub async fn case_timeline(&self, params: &QueryParams) -> Result<Vec<TimelineEntry>> {
        let id = params
            .first("id")
            .ok_or_else(|| ProcessMiningError::validation("Missing id parameter."))?;

        let activities = self
            .store
            .list_activities(&ActivityFilter::for_cases([id.to_string()]), None)
            .await?;
        if activities.is_empty() {
            return Err(ProcessMiningError::not_found(
                "No activities found for this case.",
            ));
        }

        Ok(case_timeline(&activities))
    }

    /// Per-case summaries: GET /api/case-explorer/
    pub async fn case_explorer(&self, params: &QueryParams) -> Result<Page<CaseSummary>> {
        let request = self.page_request(params)?;
        let activities = self.filtered_activities(params).await?;

        Page::from_all(summarize_cases(&activities), &request, &self.links(params))
    }

    /// Filter widget metadata: GET /api/metadata/
    pub async fn metadata(&self) -> Result<Metadata> {
        let case_ids = self.store.activity_case_ids().await?;
        let names = self.store.activity_names().await?;
        Ok(Metadata::new(case_ids, names))
    }

    async fn filtered_activities(&self, params: &QueryParams) -> Result<Vec<Activity>> {
        let mut filter = ActivityFilter::from_params(params)?;
        self.resolve_variants(&mut filter, Self::sequence_mode(params)?)
            .await?;
        self.store.list_activities(&filter, None).await
    }

    // Reworks

    /// Derived reworks: GET /api/reworks/
    pub async fn list_reworks(&self, params: &QueryParams) -> Result<Page<Rework>> {
        let request = self.page_request(params)?;
        let activities = self.filtered_activities(params).await?;

        Page::from_all(detect_reworks(&activities), &request, &self.links(params))
    }

    /// Rework summary: GET /api/reworks/summary
    pub async fn rework_summary(&self, params: &QueryParams) -> Result<ReworkSummary> {
        let activities = self.filtered_activities(params).await?;
        Ok(summarize_reworks(&activities))
    }

    // Order items and bills

    /// Order item listing: GET /api/order-items/
    pub async fn list_order_items(&self, params: &QueryParams) -> Result<Page<OrderItem>> {
        let request = self.page_request(params)?;
        let filter = OrderItemFilter::from_params(params)?;

        let count = self.store.count_order_items(&filter).await?;
        request.ensure_in_range(count)?;
        let results = self
            .store
            .list_order_items(&filter, Some(request.window()))
            .await?;

        Ok(Page::new(results, count, &request, &self.links(params)))
    }

    /// Free-text ordering summary: GET /api/order-items/free-text-summary
    ///
    /// Any `free_text` parameter is ignored; both sides are always counted.
    pub async fn free_text_summary(&self, params: &QueryParams) -> Result<FreeTextSummary> {
        let filter = OrderItemFilter::from_params(params)?;

        let free_text = self
            .store
            .count_order_items(&filter.with_free_text(Some(true)))
            .await?;
        let catalog = self
            .store
            .count_order_items(&filter.with_free_text(Some(false)))
            .await?;

        Ok(FreeTextSummary::from_counts(free_text, catalog))
    }

    /// Contract usage KPIs: GET /api/order-items/contract-usage
    ///
    /// The previous period reuses every filter except the date window.
    pub async fn contract_usage(&self, params: &QueryParams) -> Result<ContractUsageKpi> {
        let filter = OrderItemFilter::from_params(params)?;
        let current = self.store.list_order_items(&filter, None).await?;

        let Some(window) = filter.window.previous_period() else {
            return Ok(ContractUsageKpi::new(&current, None));
        };
        let previous = self
            .store
            .list_order_items(&filter.with_window(window), None)
            .await?;

        debug!(
            current_items = current.len(),
            previous_items = previous.len(),
            "Computed contract usage periods"
        );
        Ok(ContractUsageKpi::new(&current, Some((window, previous.as_slice()))))
    }

    /// Contract usage per branch: GET /api/order-items/contract-usage/branches
    pub async fn contract_usage_by_branch(&self, params: &QueryParams) -> Result<Vec<BranchUsage>> {
        let filter = OrderItemFilter::from_params(params)?;
        let items = self.store.list_order_items(&filter, None).await?;
        Ok(branch_usage(&items))
    }

    /// Bill listing: GET /api/bills/
    pub async fn list_bills(&self, params: &QueryParams) -> Result<Page<Bill>> {
        let request = self.page_request(params)?;
        let filter = BillFilter::from_params(params)?;

        let count = self.store.count_bills(&filter).await?;
        request.ensure_in_range(count)?;
        let results = self.store.list_bills(&filter, Some(request.window())).await?;

        Ok(Page::new(results, count, &request, &self.links(params)))
    }

    // Alerts

    pub async fn create_alert(&self, alert: NewAlert) -> Result<Alert> {
        let alert = self.store.create_alert(alert).await?;
        debug!(alert_id = %alert.id, severity = %alert.severity, "Created alert");
        Ok(alert)
    }

    pub async fn list_alerts(&self, params: &QueryParams) -> Result<Page<Alert>> {
        let request = self.page_request(params)?;

        let count = self.store.count_alerts().await?;
        request.ensure_in_range(count)?;
        let results = self.store.list_alerts(request.window()).await?;

        Ok(Page::new(results, count, &request, &self.links(params)))
    }

    pub async fn get_alert(&self, id: Uuid) -> Result<Alert> {
        self.store
            .find_alert(id)
            .await?
            .ok_or_else(|| ProcessMiningError::not_found(format!("Alert {id} not found")))
    }

    pub async fn delete_alert(&self, id: Uuid) -> Result<()> {
        if self.store.delete_alert(id).await? {
            debug!(alert_id = %id, "Deleted alert");
            Ok(())
        } else {
            Err(ProcessMiningError::not_found(format!("Alert {id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProcessStore;
    use chrono::{Duration, TimeZone, Utc};
    use ActivityName::*;

    fn activity(id: i64, case_id: &str, name: ActivityName, offset_minutes: i64) -> Activity {
        Activity {
            id,
            case_id: case_id.to_string(),
            name,
            timestamp: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
                + Duration::minutes(offset_minutes),
            tpt: 0.0,
            user: String::new(),
            user_type: String::new(),
            automatic: false,
            rework: false,
            case_index: String::new(),
        }
    }

    fn service() -> ProcessMiningService {
        let store = MemoryProcessStore::new();
        store.insert_activities(vec![
            activity(1, "A", Create, 0),
            activity(2, "A", Update, 10),
            activity(3, "A", Close, 20),
            activity(4, "B", Create, 0),
            activity(5, "B", Update, 30),
            activity(6, "B", Close, 60),
            activity(7, "C", Create, 0),
            activity(8, "C", Close, 5),
        ]);
        ProcessMiningService::new(Arc::new(store), PaginationConfig::default(), None)
    }

    fn params(query: &str) -> QueryParams {
        QueryParams::parse("/api/test/", Some(query))
    }

    #[tokio::test]
    async fn test_variant_filter_on_activities() {
        let page = service().list_activities(&params("var=2")).await.unwrap();
        assert_eq!(page.count, 2);
        assert!(page.results.iter().all(|a| a.case_id == "C"));
    }

    #[tokio::test]
    async fn test_unknown_variant_matches_nothing() {
        let page = service().list_activities(&params("var=99")).await.unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_filtered_variants_keep_global_ids() {
        let page = service().list_variants(&params("case=C")).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].id, 2);
        assert_eq!(page.results[0].percentage, 100.0);
    }

    #[tokio::test]
    async fn test_required_activities_narrow_population() {
        let page = service()
            .list_variants(&params("activities=UPDATE"))
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].cases, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_kpi_requires_both_edge_ends() {
        let err = service().kpis(&params("from=CREATE")).await.unwrap_err();
        assert!(matches!(err, ProcessMiningError::Validation(_)));
    }

    #[tokio::test]
    async fn test_timeline_errors() {
        let svc = service();
        assert!(matches!(
            svc.case_timeline(&params("")).await,
            Err(ProcessMiningError::Validation(_))
        ));
        assert!(matches!(
            svc.case_timeline(&params("id=Z")).await,
            Err(ProcessMiningError::NotFound(_))
        ));
        assert_eq!(svc.case_timeline(&params("id=B")).await.unwrap().len(), 3);
    }
}
