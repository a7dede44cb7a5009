//! # Pagination
//!
//! Page-number pagination producing the dashboard's list envelope:
//! `{count, next, previous, results}`.

use serde::Serialize;

use super::params::QueryParams;
use crate::config::PaginationConfig;
use crate::error::{ProcessMiningError, Result};

/// Requested page (1-indexed) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

/// LIMIT/OFFSET window handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Read `page` and `page_size`, applying configured defaults and limits
    pub fn from_params(params: &QueryParams, limits: &PaginationConfig) -> Result<Self> {
        let page = params.positive_int("page")?.unwrap_or(1);
        let page_size = params
            .positive_int("page_size")?
            .unwrap_or(limits.default_page_size);

        if page_size > limits.max_page_size {
            return Err(ProcessMiningError::validation(format!(
                "page_size must be between 1 and {}",
                limits.max_page_size
            )));
        }

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.page_size,
            offset: self.offset(),
        }
    }

    /// Pages past the end of a non-empty result set do not exist.
    /// The first page always exists, even when empty.
    pub fn ensure_in_range(&self, count: u64) -> Result<()> {
        if self.page > 1 && self.offset() >= count {
            return Err(ProcessMiningError::not_found("Invalid page."));
        }
        Ok(())
    }

    pub fn has_next(&self, count: u64) -> bool {
        self.offset().saturating_add(self.page_size) < count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Slice an already materialized, ordered result set
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// Builds `next`/`previous` links from the originating request
#[derive(Debug, Clone)]
pub struct PageLinks {
    base_url: Option<String>,
    params: QueryParams,
}

impl PageLinks {
    pub fn new(base_url: Option<&str>, params: &QueryParams) -> Self {
        Self {
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
            params: params.clone(),
        }
    }

    pub fn link_for(&self, page: u64) -> String {
        format!(
            "{}{}?{}",
            self.base_url.as_deref().unwrap_or(""),
            self.params.path(),
            self.params.with_page(page)
        )
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: u64, request: &PageRequest, links: &PageLinks) -> Self {
        let next = request
            .has_next(count)
            .then(|| links.link_for(request.page + 1));
        let previous = request
            .has_previous()
            .then(|| links.link_for(request.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Paginate a fully materialized result set
    pub fn from_all(items: Vec<T>, request: &PageRequest, links: &PageLinks) -> Result<Self> {
        let count = items.len() as u64;
        request.ensure_in_range(count)?;
        Ok(Self::new(request.slice(items), count, request, links))
    }
}
