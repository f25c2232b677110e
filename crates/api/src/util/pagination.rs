use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard paginated response envelope
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Number of items on this page
    pub count: usize,
    /// Items across all pages
    pub total: u64,
    /// Current page, starting at 1
    pub page: u64,
    /// Total number of pages
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, limit: i64) -> Page<T> {
        Page {
            count: data.len(),
            data,
            total,
            page,
            pages: total.div_ceil(limit.max(1) as u64),
        }
    }
}

/// Common `page` and `limit` query parameters
#[derive(Deserialize, JsonSchema, FromForm)]
pub struct OptionsPage {
    /// Page to fetch, starting at 1
    pub page: Option<u64>,
    /// Items per page
    pub limit: Option<i64>,
}

impl OptionsPage {
    /// Resolve to a (page, limit, skip) triple
    pub fn resolve(&self, default_limit: i64) -> (u64, i64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).max(1);
        let skip = (page - 1) * limit as u64;
        (page, limit, skip)
    }
}
