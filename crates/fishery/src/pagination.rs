use serde::Serialize;

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Result<Self> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::validation("limit", "Page size must be at least 1"));
        }

        Ok(Self {
            page: page.unwrap_or(0),
            page_size,
        })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub has_more: bool,
}

/// Cut one page out of the full filtered set.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> (Vec<T>, Pagination) {
    let total_records = items.len();
    let start = request.page.saturating_mul(request.page_size);
    let end = start.saturating_add(request.page_size);

    let page = items
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect();

    let pagination = Pagination {
        page: request.page,
        page_size: request.page_size,
        total_records,
        has_more: request
            .page
            .saturating_add(1)
            .saturating_mul(request.page_size)
            < total_records,
    };

    (page, pagination)
}

/// Everything on a single page, used for owner queries.
pub fn single_page(total_records: usize) -> Pagination {
    Pagination {
        page: 0,
        page_size: total_records,
        total_records,
        has_more: false,
    }
}
