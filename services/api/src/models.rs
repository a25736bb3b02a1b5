//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

/// Query parameters shared by paginated listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Resolve the effective page and limit, clamping the limit to 1..=100
    pub fn resolve(&self, default_limit: u32) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        (page, limit)
    }

    /// Row offset for the resolved page
    pub fn offset(page: u32, limit: u32) -> i64 {
        (page - 1) as i64 * limit as i64
    }
}

/// Response for paginated listings
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.resolve(6), (1, 6));
    }

    #[test]
    fn test_page_query_clamps_limit() {
        let query = PageQuery {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(query.resolve(6), (1, 100));
    }

    #[test]
    fn test_page_query_offset() {
        assert_eq!(PageQuery::offset(1, 6), 0);
        assert_eq!(PageQuery::offset(3, 6), 12);
    }
}
