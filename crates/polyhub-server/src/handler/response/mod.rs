//! Response types for HTTP handlers.

use polyhub_core::types::PageRequest;
use polyhub_postgres::types::{OffsetPage, OffsetPagination};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod accounts;
mod authentications;
mod catalog;
mod deals;
mod errors;
mod monitors;
mod notifications;
mod quotes;

pub use accounts::*;
pub use authentications::*;
pub use catalog::*;
pub use deals::*;
pub use errors::*;
pub use monitors::*;
pub use notifications::*;
pub use quotes::*;

/// Generic paginated response wrapper.
///
/// Pages are one-based. `total` counts every item matching the query.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "{T}sPage")]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total count of items matching the query.
    pub total: u64,
    /// Current page number.
    pub page: u32,
    /// Number of pages at the current page size.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a new page from items and pagination metadata.
    pub fn new(items: Vec<T>, total: u64, page: u32, total_pages: u64) -> Self {
        Self {
            items,
            total,
            page,
            total_pages,
        }
    }

    /// Maps items from one type to another.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
        }
    }

    /// Creates a page from a database offset page, mapping items using the
    /// provided function.
    pub fn from_offset_page<M, F>(page: OffsetPage<M>, pagination: OffsetPagination, f: F) -> Self
    where
        F: FnMut(M) -> T,
    {
        let total_pages = page.total_pages(&pagination).max(0) as u64;
        Self {
            items: page.items.into_iter().map(f).collect(),
            total: page.total.max(0) as u64,
            page: pagination.page_number().clamp(1, i64::from(u32::MAX)) as u32,
            total_pages,
        }
    }

    /// Creates a page from items that were fetched with a domain page request.
    pub fn from_request(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self::new(items, total, request.page(), request.total_pages(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_pages_report_one_based_numbers() {
        let pagination = OffsetPagination::from_page(3, 10);
        let page = Page::from_offset_page(OffsetPage::new(vec![1, 2], 22), pagination, |n| n * 2);

        assert_eq!(page.items, vec![2, 4]);
        assert_eq!(page.total, 22);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
    }
}
