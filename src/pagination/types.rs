//! Pagination types and traits
//!
//! WooCommerce collections are paged by number. The first request carries
//! no `page` parameter; later requests ask for page 2, 3, ... until the
//! `X-WP-TotalPages` header says there is nothing left.

use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// Hard ceiling on consecutive failed page fetches in degraded mode
pub const MAX_CONSECUTIVE_ERRORS: u32 = 20;

/// Page token for the next request
///
/// `None` is the implicit first page (no `page` parameter sent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor(Option<u32>);

impl PageCursor {
    /// The implicit first page
    pub fn first() -> Self {
        Self(None)
    }

    /// An explicit page number
    pub fn page(page: u32) -> Self {
        Self(Some(page))
    }

    /// Page number to send, if any
    pub fn number(&self) -> Option<u32> {
        self.0
    }

    /// Page number this cursor fetches (the first page is page 1)
    pub fn effective_page(&self) -> u32 {
        self.0.unwrap_or(1)
    }

    /// Cursor for the page after this one
    #[must_use]
    pub fn next(&self) -> Self {
        match self.0 {
            None => Self(Some(2)),
            Some(page) => Self(Some(page.saturating_add(1))),
        }
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(page) => write!(f, "page {page}"),
            None => write!(f, "first page"),
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this page next
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor of the page being fetched
    pub cursor: PageCursor,
    /// Failed fetches since the last success
    pub consecutive_errors: u32,
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next cursor
    ///
    /// Fails with [`Error::PaginationLoop`] when the server would make us
    /// request the same page again.
    pub fn advance(&mut self, next: PageCursor, path: &str) -> Result<()> {
        if next == self.cursor {
            return Err(Error::PaginationLoop {
                path: path.to_string(),
                page: next.effective_page(),
            });
        }
        self.cursor = next;
        Ok(())
    }

    /// Record a successful page
    pub fn record_success(&mut self) {
        self.consecutive_errors = 0;
        self.pages_fetched += 1;
    }

    /// Record a failed page, returning true once the error ceiling is hit
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_errors += 1;
        self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the request at `cursor`
    fn request_params(&self, cursor: PageCursor) -> HashMap<String, String>;

    /// Decide the next page from a successful response
    fn next_page(&self, headers: &HeaderMap, cursor: PageCursor) -> NextPage;

    /// Decide the next page after a tolerated failure
    ///
    /// The page count is unknown, so assume there is one more.
    fn next_after_failure(&self, cursor: PageCursor) -> NextPage {
        NextPage::Continue(cursor.next())
    }
}
