//! Page/limit handling for list and search endpoints

use serde::{Deserialize, Serialize};

use crate::config::PageLimits;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl Pagination {
    /// Page is clamped to a minimum of 1, limit to 1..=max
    pub fn new(page: Option<u32>, limit: Option<u32>, limits: PageLimits) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(limits.default).clamp(1, limits.max),
        }
    }

    /// SQL OFFSET value
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// SQL LIMIT value
    pub fn limit(&self) -> i64 {
        self.limit as i64
    }

    pub fn info(&self, total: i64) -> PageInfo {
        let total = total.max(0);
        let limit = self.limit as i64;
        let total_pages = (total + limit - 1) / limit;

        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            has_next: (self.page as i64) < total_pages,
            has_prev: self.page > 1,
        }
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}
