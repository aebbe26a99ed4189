//! parinaam - NITH result portal scraper
//!
//! Fetches student result pages from the NITH result portal by roll number,
//! extracts structured semester/subject/grade data from the returned HTML,
//! and persists it as JSON/CSV artifacts.
//!
//! # Architecture
//!
//! - [`roll`] - Roll number generation and validation
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - HTTP fetching with retry and rate limiting
//! - [`parser`] - HTML parsing and result extraction (the core)
//! - [`batch`] - Sequential batch orchestration
//! - [`storage`] - JSON/CSV artifact writing
//! - [`models`] - Core data structures
//!
//! # Example
//!
//! ```no_run
//! use parinaam::batch::BatchRunner;
//! use parinaam::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut runner = BatchRunner::new(config, None)?;
//!     runner.run_department("21", "BCS").await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod roll;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::{BatchRunner, BatchStats};
    pub use crate::config::Config;
    pub use crate::crawler::ResultFetcher;
    pub use crate::error::{ExtractError, FetchError};
    pub use crate::models::{SemesterRecord, StudentRecord, SubjectRecord, SummaryRecord};
    pub use crate::parser::ResultExtractor;
    pub use crate::storage::ResultWriter;
}

// Direct re-exports for convenience
pub use models::{SemesterRecord, StudentRecord, SubjectRecord, SummaryRecord};
