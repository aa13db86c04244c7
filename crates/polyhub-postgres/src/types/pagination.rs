//! Offset-based pagination for database queries.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum number of items per page.
pub const MAX_LIMIT: i64 = 100;

/// Offset-based pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OffsetPagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl OffsetPagination {
    /// Creates a new pagination instance.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_LIMIT);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

/// Result of an offset-paginated query with the total match count.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of items matching the query (across all pages).
    pub total: i64,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Returns the total number of pages.
    pub fn total_pages(&self, pagination: &OffsetPagination) -> i64 {
        (self.total + pagination.limit - 1) / pagination.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_checking() {
        assert_eq!(OffsetPagination::new(0, 10).limit, 1);
        assert_eq!(OffsetPagination::new(1500, 10).limit, MAX_LIMIT);
        assert_eq!(OffsetPagination::new(10, -5).offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = OffsetPagination::from_page(3, 10);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 20);
        assert_eq!(pagination.page_number(), 3);

        let pagination = OffsetPagination::from_page(0, 20);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn offset_page_total_pages() {
        let pagination = OffsetPagination::new(10, 0);

        assert_eq!(OffsetPage::<i32>::new(vec![], 25).total_pages(&pagination), 3);
        assert_eq!(OffsetPage::<i32>::new(vec![], 30).total_pages(&pagination), 3);
        assert_eq!(OffsetPage::<i32>::new(vec![], 0).total_pages(&pagination), 0);
    }
}
