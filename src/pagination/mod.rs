//! Pagination module
//!
//! # Overview
//!
//! Page-number pagination as served by the WooCommerce REST API. The
//! strategy only computes cursors; the sync engine owns the fetch loop and
//! feeds every response (or tolerated failure) back through
//! [`Paginator`] and [`PaginationState`].

mod strategies;
mod types;

pub use strategies::{TotalPagesPaginator, DEFAULT_PER_PAGE, TOTAL_PAGES_HEADER};
pub use types::{NextPage, PageCursor, PaginationState, Paginator, MAX_CONSECUTIVE_ERRORS};
