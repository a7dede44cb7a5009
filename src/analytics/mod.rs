//! # Analytics
//!
//! Pure aggregation over fetched rows: variants, transition KPIs, case
//! summaries, rework, free-text ordering and contract usage. Nothing here
//! touches the store.

pub mod cases;
pub mod contract_usage;
pub mod free_text;
pub mod kpi;
pub mod rework;
pub mod variants;

pub use cases::{case_timeline, summarize_cases, CaseSummary, Metadata, TimelineEntry};
pub use contract_usage::{branch_usage, BranchUsage, ContractUsageKpi, ContractUsageMetrics};
pub use free_text::{FreeTextStatus, FreeTextSummary};
pub use kpi::{compute_kpis, EdgeKpi, KpiReport};
pub use rework::{detect_reworks, summarize_reworks, Rework, ReworkStatus, ReworkSummary};
pub use variants::{
    assign_global_ids, build_traces, compute_variants, CaseTrace, SequenceMode, Variant,
};
