//! # Article Harvest
//!
//! An extraction engine that turns news pages into flat, structured article
//! records (title, link, author, publication date, source).
//!
//! ## Paths
//!
//! - **No target URL**: built-in site adapters (TechCrunch, The Verge,
//!   BBC News, Ars Technica) run concurrently; results are concatenated in
//!   registry order.
//! - **Article-like URL**: the page is fetched once and its fields are read
//!   through fixed fallback chains.
//! - **Listing-like URL**: candidate links are discovered heuristically,
//!   each candidate is fetched concurrently, and the records come back in
//!   discovery order.
//!
//! The merged list is then filtered by keyword and ordered by date or
//! relevance on request.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo() -> article_harvest::Result<()> {
//! use article_harvest::{Settings, run_with_http};
//!
//! let settings = Settings::default();
//! let records = run_with_http(&settings, "https://example.com/news", "", "date").await?;
//! println!("{}", serde_json::to_string_pretty(&records).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod ordering;
pub mod sites;
pub mod utils;

pub use aggregate::{run, run_with_http};
pub use config::Settings;
pub use error::{HarvestError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use models::{ArticleRecord, SortBy};
