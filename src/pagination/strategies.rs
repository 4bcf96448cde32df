//! Pagination strategy implementations

use super::types::{NextPage, PageCursor, Paginator};
use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// Default WooCommerce page size (the API maximum)
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Header carrying the total number of pages
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Page number pagination driven by a total-pages header
///
/// Request shape: `?per_page=100&order=asc&page=N`.
#[derive(Debug, Clone)]
pub struct TotalPagesPaginator {
    /// Response header with the page count
    pub total_header: String,
    /// Records per page
    pub per_page: u32,
    /// Sort order sent with every request
    pub order: String,
}

impl Default for TotalPagesPaginator {
    fn default() -> Self {
        Self {
            total_header: TOTAL_PAGES_HEADER.to_string(),
            per_page: DEFAULT_PER_PAGE,
            order: "asc".to_string(),
        }
    }
}

impl TotalPagesPaginator {
    /// Create a paginator with WooCommerce defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Parse the total page count from response headers
    pub fn total_pages(&self, headers: &HeaderMap) -> Option<u32> {
        headers
            .get(self.total_header.as_str())
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Paginator for TotalPagesPaginator {
    fn request_params(&self, cursor: PageCursor) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("per_page".to_string(), self.per_page.to_string());
        params.insert("order".to_string(), self.order.clone());
        if let Some(page) = cursor.number() {
            params.insert("page".to_string(), page.to_string());
        }
        params
    }

    fn next_page(&self, headers: &HeaderMap, cursor: PageCursor) -> NextPage {
        let Some(total) = self.total_pages(headers) else {
            return NextPage::Done;
        };

        match cursor.number() {
            None if total >= 2 => NextPage::Continue(cursor.next()),
            Some(page) if total > page => NextPage::Continue(cursor.next()),
            _ => NextPage::Done,
        }
    }
}
