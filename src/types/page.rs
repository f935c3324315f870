//! Page envelopes.

use serde::{Deserialize, Serialize};

/// Page envelope used by the remote list endpoints.
///
/// Every field defaults when absent, so a partial body still yields a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// A page with no rows, used when a request failed.
    pub fn empty(page_no: u32, page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            page_no,
            page_size,
            total_count: 0,
            total_pages: 0,
        }
    }
}

/// Page envelope produced by the local store (one-based pages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPage<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> LocalPage<T> {
    /// Slice one page out of the full collection.
    ///
    /// Page numbers start at 1; page 0 is treated as page 1.
    pub fn slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let total = all.len() as u64;
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let data = all.into_iter().skip(start).take(limit as usize).collect();
        Self {
            data,
            total,
            page,
            limit,
        }
    }
}
