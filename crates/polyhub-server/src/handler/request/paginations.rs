//! Page-number pagination parameters.

use polyhub_core::types::PageRequest;
use polyhub_postgres::types::OffsetPagination;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One-based page parameters shared by every list endpoint.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Pagination {
    /// Page number, starting at 1.
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u32>,

    /// Number of items per page.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl Pagination {
    /// Default page size.
    const DEFAULT_LIMIT: u32 = PageRequest::DEFAULT_LIMIT;

    #[inline]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Returns the page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Returns the page size.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

impl From<Pagination> for PageRequest {
    fn from(pagination: Pagination) -> Self {
        PageRequest::new(pagination.page(), pagination.limit())
    }
}

impl From<Pagination> for OffsetPagination {
    fn from(pagination: Pagination) -> Self {
        OffsetPagination::from_page(i64::from(pagination.page()), i64::from(pagination.limit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let request = PageRequest::from(Pagination::default());
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);

        let offset = OffsetPagination::from(Pagination::new(3, 20));
        assert_eq!(offset.offset, 40);
        assert_eq!(offset.limit, 20);
    }

    #[test]
    fn rejects_oversized_pages() {
        assert!(Pagination::new(1, 500).validate().is_err());
        assert!(Pagination::new(0, 10).validate().is_err());
    }
}
