//! # Query Layer
//!
//! Turns request query strings into typed filters and page requests.

pub mod filter;
pub mod pagination;
pub mod params;

pub use filter::{
    ActivityFilter, BillFilter, CaseAttributeFilter, CaseFilter, DateWindow, OrderItemFilter,
};
pub use pagination::{Page, PageLinks, PageRequest, PageWindow};
pub use params::QueryParams;
