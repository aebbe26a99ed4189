//! HTML parsing and data extraction
//!
//! This module turns raw result-page markup into
//! [`StudentRecord`](crate::models::StudentRecord)s via a defensive,
//! style-marker driven single pass.

pub mod extract;
pub mod sanitize;

pub use extract::ResultExtractor;
