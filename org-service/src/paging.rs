//! Generic page-slicing and predicate helpers used by every list operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pagination parameters. Pages are 1-based.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Create a page request, clamping both fields to a minimum of 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// A page of results. `total` is the pre-slice count of the filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

/// Slice a filtered collection into the requested page.
///
/// An out-of-range page yields an empty item list with `total` still
/// reflecting the full filtered count; this is never an error.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let total = items.len();
    let start = request.page.saturating_sub(1) as usize * request.limit as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(request.limit as usize)
        .collect();

    Page {
        items,
        page: request.page,
        limit: request.limit,
        total,
    }
}

/// Case-insensitive substring match; an absent filter always matches.
pub fn matches_search(haystack: &str, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Exact foreign-key match; an absent filter always matches.
pub fn matches_id(id: Uuid, filter: Option<Uuid>) -> bool {
    filter.is_none_or(|expected| expected == id)
}
