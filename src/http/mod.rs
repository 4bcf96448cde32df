//! HTTP client module
//!
//! Request pipeline for the WooCommerce REST API.
//!
//! # Features
//!
//! - **Classification**: every response becomes success, retryable, fatal or ignorable
//! - **Automatic Retries**: exponential backoff (factor 4) on transient failures
//! - **Rate Limiting**: optional token bucket using governor
//! - **User Agents**: rotating desktop Chrome strings unless overridden

mod classify;
mod client;
mod rate_limit;
mod retry;
mod user_agent;

pub use classify::{classify, BodyShape, Classification};
pub use client::{Fetched, HttpClient, HttpClientConfig, HttpClientConfigBuilder, Page, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{retry, Retried, RetryPolicy};
pub use user_agent::UserAgent;
