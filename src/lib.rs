//! Scope-bounded documentation crawler backed by a remote headless browser.
//!
//! Pages are rendered through a shared browser service (chromiumoxide over
//! CDP), reduced to readable text by a priority-selector extractor, and
//! returned as [`PageRecord`]s. The crawl is breadth-first, bounded to the
//! seed URL's host and path prefixes, and deliberately slow: fixed pacing
//! between page visits keeps the load on crawled sites negligible.
//!
//! ```no_run
//! use siteharvest::{crawl_site, CrawlConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CrawlConfig::builder()
//!     .start_url("https://docs.example.com/guide")
//!     .max_pages(50)
//!     .build()?;
//! let pages = crawl_site(config).await?;
//! for page in &pages {
//!     println!("{}: {} chars", page.url, page.content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod chunker;
pub mod config;
pub mod crawl_engine;
pub mod extractor;
pub mod normalize;
pub mod scope;

pub use browser::{BrowserSession, FetchError, FetchErrorKind};
pub use chunker::{chunk_text, Chunks, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP};
pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use crawl_engine::{
    crawl_pages, CrawlStats, NoOpPageSink, NoOpProgress, PageRecord, PageSink, ProgressSink,
};
pub use extractor::{extract, ExtractedContent};
pub use normalize::normalize_url;
pub use scope::ScopeConfig;

use anyhow::Result;

/// Crawl a site with no observers attached and collect the accepted records.
///
/// Convenience wrapper over [`crawl_pages`] for callers that only want the
/// final result; pass your own [`ProgressSink`] and [`PageSink`] to
/// `crawl_pages` for streaming consumption.
///
/// # Errors
/// Fails only on an invalid start URL; an unreachable browser service yields
/// an empty result instead.
pub async fn crawl_site(config: CrawlConfig) -> Result<Vec<PageRecord>> {
    crawl_pages(config, NoOpProgress, NoOpPageSink).await
}
