//! Result-page fetching with rate limiting
//!
//! This module implements the HTTP side of the scraper: posting the result
//! form to the portal's per-year endpoint with rotated headers, retry, and
//! pacing-friendly rate limiting.

pub mod fetcher;
pub mod headers;

pub use fetcher::ResultFetcher;
