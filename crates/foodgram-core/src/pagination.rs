// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Converts page/limit query parameters into offsets and wraps results with counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination parameters as supplied by the client
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Create parameters for a specific page and size
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Resolve to a concrete page request, clamping out-of-range values
    #[must_use]
    pub fn resolve(&self, default_limit: u32) -> PageRequest {
        let default_limit = default_limit.clamp(1, MAX_PAGE_SIZE);
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// SQL `OFFSET` for this page
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    /// SQL `LIMIT` for this page
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// Next page number, if any
    pub next: Option<u32>,
    /// Previous page number, if any
    pub previous: Option<u32>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one page of results with navigation metadata
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest) -> Self {
        let seen = u64::from(request.page) * u64::from(request.limit);
        let next = (seen < count).then(|| request.page + 1);
        let previous = (request.page > 1).then(|| request.page - 1);
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the items while keeping the navigation metadata
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
