//! # Contract Usage
//!
//! How much of the ordered volume went through framework contracts, for a
//! period and the equally long period before it, plus a per-branch table.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::round_percent;
use crate::models::OrderItem;
use crate::query::DateWindow;

fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_percent(part as f64 * 100.0 / total as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractUsageMetrics {
    pub orders: u64,
    pub order_items: u64,
    pub order_item_value: f64,
    pub contract_usage_count: u64,
    pub contract_usage_eur: f64,
    pub contract_usage_rate: f64,
    pub contract_available_but_not_used_count: u64,
    pub contract_available_but_not_used_eur: f64,
}

impl ContractUsageMetrics {
    pub fn from_items(items: &[OrderItem]) -> Self {
        let orders: BTreeSet<&str> = items.iter().map(|i| i.order_id.as_str()).collect();
        let mut metrics = Self {
            orders: orders.len() as u64,
            order_items: items.len() as u64,
            ..Self::default()
        };

        for item in items {
            let value = item.net_value();
            metrics.order_item_value += value;
            if item.uses_contract() {
                metrics.contract_usage_count += 1;
                metrics.contract_usage_eur += value;
            } else if item.contract_available() {
                metrics.contract_available_but_not_used_count += 1;
                metrics.contract_available_but_not_used_eur += value;
            }
        }

        metrics.order_item_value = round_amount(metrics.order_item_value);
        metrics.contract_usage_eur = round_amount(metrics.contract_usage_eur);
        metrics.contract_available_but_not_used_eur =
            round_amount(metrics.contract_available_but_not_used_eur);
        metrics.contract_usage_rate = rate(metrics.contract_usage_count, metrics.order_items);
        metrics
    }
}

/// Current period against the previous one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractUsageKpi {
    pub current: ContractUsageMetrics,
    pub previous: Option<ContractUsageMetrics>,
    pub previous_start_date: Option<NaiveDate>,
    pub previous_end_date: Option<NaiveDate>,
}

impl ContractUsageKpi {
    /// `previous` pairs the earlier window with its items; absent when the
    /// requested window is open-ended.
    pub fn new(current: &[OrderItem], previous: Option<(DateWindow, &[OrderItem])>) -> Self {
        let (previous_window, previous) = match previous {
            Some((window, items)) => (window, Some(ContractUsageMetrics::from_items(items))),
            None => (DateWindow::default(), None),
        };

        Self {
            current: ContractUsageMetrics::from_items(current),
            previous,
            previous_start_date: previous_window.start,
            previous_end_date: previous_window.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchUsage {
    pub branch: String,
    pub order_items: u64,
    pub net_order_value: f64,
    pub usage_rate: f64,
    pub usage_eur: f64,
}

/// Contract usage per branch, busiest branch first
pub fn branch_usage(items: &[OrderItem]) -> Vec<BranchUsage> {
    #[derive(Default)]
    struct Totals {
        items: u64,
        value: f64,
        used: u64,
        used_value: f64,
    }

    let mut by_branch: BTreeMap<&str, Totals> = BTreeMap::new();
    for item in items {
        let totals = by_branch.entry(item.branch.as_str()).or_default();
        let value = item.net_value();
        totals.items += 1;
        totals.value += value;
        if item.uses_contract() {
            totals.used += 1;
            totals.used_value += value;
        }
    }

    let mut table: Vec<BranchUsage> = by_branch
        .into_iter()
        .map(|(branch, totals)| BranchUsage {
            branch: branch.to_string(),
            order_items: totals.items,
            net_order_value: round_amount(totals.value),
            usage_rate: rate(totals.used, totals.items),
            usage_eur: round_amount(totals.used_value),
        })
        .collect();

    // Stable sort keeps branch-name order among equal counts
    table.sort_by(|a, b| b.order_items.cmp(&a.order_items));
    table
}
