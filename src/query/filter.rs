//! # Record Filters
//!
//! Typed filters built from request parameters. Values of a repeated key
//! are alternatives (OR); distinct keys must all hold (AND). An empty value
//! list places no restriction.
//!
//! Every filter carries an in-process `matches` predicate. The PostgreSQL
//! store translates the same filters into SQL in the model layer.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

use super::params::QueryParams;
use crate::constants::ActivityName;
use crate::error::{ProcessMiningError, Result};
use crate::models::{Activity, Bill, Case, OrderItem};

fn any_match(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

fn flag_match(expected: Option<bool>, value: bool) -> bool {
    expected.map_or(true, |e| e == value)
}

/// Inclusive calendar-date window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ProcessMiningError::validation(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Self::new(params.date("start_date")?, params.date("end_date")?)
    }

    /// The equally long window that ends the day before this one starts.
    /// `None` unless both bounds are set.
    pub fn previous_period(&self) -> Option<DateWindow> {
        let (start, end) = (self.start?, self.end?);
        let days = (end - start).num_days() + 1;
        let previous_end = start.pred_opt()?;
        let previous_start = start.checked_sub_signed(chrono::Duration::days(days))?;
        Some(DateWindow {
            start: Some(previous_start),
            end: Some(previous_end),
        })
    }

    /// First instant inside the window
    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start.and_then(midnight_utc)
    }

    /// First instant after the window; the end date is included in full
    pub fn end_before(&self) -> Option<DateTime<Utc>> {
        self.end.and_then(|end| end.succ_opt()).and_then(midnight_utc)
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start_at().map_or(true, |start| timestamp >= start)
            && self.end_before().map_or(true, |end| timestamp < end)
    }
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Case attribute predicates shared by the activity and case filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseAttributeFilter {
    pub case_types: Vec<String>,
    pub branches: Vec<String>,
    pub ramos: Vec<String>,
    pub brokers: Vec<String>,
    pub states: Vec<String>,
    pub clients: Vec<String>,
    pub creators: Vec<String>,
}

impl CaseAttributeFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            case_types: params.strings("type"),
            branches: params.strings("branch"),
            ramos: params.strings("ramo"),
            brokers: params
                .all_of(&["broker", "brocker"])
                .into_iter()
                .map(str::to_string)
                .collect(),
            states: params.strings("state"),
            clients: params.strings("client"),
            creators: params.strings("creator"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.case_types.is_empty()
            && self.branches.is_empty()
            && self.ramos.is_empty()
            && self.brokers.is_empty()
            && self.states.is_empty()
            && self.clients.is_empty()
            && self.creators.is_empty()
    }

    pub fn matches(&self, case: &Case) -> bool {
        any_match(&self.case_types, &case.case_type)
            && any_match(&self.branches, &case.branch)
            && any_match(&self.ramos, &case.ramo)
            && any_match(&self.brokers, &case.broker)
            && any_match(&self.states, &case.state)
            && any_match(&self.clients, &case.client)
            && any_match(&self.creators, &case.creator)
    }
}

/// Filter over activity records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub case_ids: Vec<String>,
    pub names: Vec<ActivityName>,
    pub case_indexes: Vec<String>,
    pub case_attributes: CaseAttributeFilter,
    /// Requested variant ids; resolved into `variant_cases` by the service layer
    pub variant_ids: Vec<u64>,
    /// Case ids belonging to the requested variants. Stores only look at this set.
    pub variant_cases: Option<BTreeSet<String>>,
    pub window: DateWindow,
    pub automatic: Option<bool>,
    pub rework: Option<bool>,
}

impl ActivityFilter {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            case_ids: params.strings("case"),
            names: params.parsed("name")?,
            case_indexes: params.strings("case_index"),
            case_attributes: CaseAttributeFilter::from_params(params),
            variant_ids: params.positive_ints("var")?,
            variant_cases: None,
            window: DateWindow::from_params(params)?,
            automatic: params.flag("automatic")?,
            rework: params.flag("rework")?,
        })
    }

    pub fn for_cases(case_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            case_ids: case_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn needs_variant_resolution(&self) -> bool {
        !self.variant_ids.is_empty() && self.variant_cases.is_none()
    }

    pub fn needs_case_join(&self) -> bool {
        !self.case_attributes.is_empty()
    }

    pub fn name_strings(&self) -> Vec<String> {
        self.names.iter().map(|n| n.as_str().to_string()).collect()
    }

    /// `case` is the owning case, when known. Attribute predicates never match a missing case.
    pub fn matches(&self, activity: &Activity, case: Option<&Case>) -> bool {
        if !any_match(&self.case_ids, &activity.case_id) {
            return false;
        }
        if !self.names.is_empty() && !self.names.contains(&activity.name) {
            return false;
        }
        if !any_match(&self.case_indexes, &activity.case_index) {
            return false;
        }
        if let Some(cases) = &self.variant_cases {
            if !cases.contains(&activity.case_id) {
                return false;
            }
        }
        if !self.window.contains(activity.timestamp) {
            return false;
        }
        if !flag_match(self.automatic, activity.automatic) || !flag_match(self.rework, activity.rework)
        {
            return false;
        }
        if self.case_attributes.is_empty() {
            return true;
        }
        case.is_some_and(|case| self.case_attributes.matches(case))
    }
}

/// Filter over case records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub case_ids: Vec<String>,
    pub attributes: CaseAttributeFilter,
}

impl CaseFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            case_ids: params.strings("case"),
            attributes: CaseAttributeFilter::from_params(params),
        }
    }

    pub fn matches(&self, case: &Case) -> bool {
        any_match(&self.case_ids, &case.id) && self.attributes.matches(case)
    }
}

/// Filter over purchase order items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderItemFilter {
    pub free_text: Option<bool>,
    pub material_codes: Vec<String>,
    pub branches: Vec<String>,
    pub order_ids: Vec<String>,
    pub window: DateWindow,
}

impl OrderItemFilter {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            free_text: params.flag("free_text")?,
            material_codes: params.strings("material_code"),
            branches: params.strings("branch"),
            order_ids: params.strings("order"),
            window: DateWindow::from_params(params)?,
        })
    }

    pub fn matches(&self, item: &OrderItem) -> bool {
        flag_match(self.free_text, item.free_text)
            && any_match(&self.material_codes, &item.material_code)
            && any_match(&self.branches, &item.branch)
            && any_match(&self.order_ids, &item.order_id)
            && self.window.contains(item.order_date)
    }

    /// Same filter with the free-text flag pinned
    pub fn with_free_text(&self, free_text: Option<bool>) -> Self {
        Self {
            free_text,
            ..self.clone()
        }
    }

    /// Same filter over another date window
    pub fn with_window(&self, window: DateWindow) -> Self {
        Self {
            window,
            ..self.clone()
        }
    }
}

/// Filter over bills
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub case_ids: Vec<String>,
    pub paid: Option<bool>,
}

impl BillFilter {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            case_ids: params.strings("case"),
            paid: params.flag("paid")?,
        })
    }

    pub fn matches(&self, bill: &Bill) -> bool {
        any_match(&self.case_ids, &bill.case_id) && flag_match(self.paid, bill.paid)
    }
}
