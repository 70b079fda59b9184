//! Core types and sink traits for crawl runs.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Marker text injected by sites that refuse to render without JavaScript.
/// Pages containing it carry no real content and are dropped.
pub(crate) const JS_DISABLED_MARKER: &str = "JavaScript has been disabled";

/// The accepted output unit of one crawled page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Snapshot of crawl progress, recomputed after each page and passed to
/// [`PageSink::on_page`]. Never persisted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Distinct normalized URLs popped so far.
    pub visited: usize,
    /// URLs currently waiting in the frontier queue.
    pub queued: usize,
    /// Accepted page records so far.
    pub scraped: usize,
    /// visited + queued.
    pub discovered: usize,
    /// In-scope, unseen links found on the page just processed.
    pub new_links: usize,
}

/// Best-effort progress notifications, one per popped URL.
///
/// Errors returned from `on_progress` are logged at debug level and ignored:
/// progress reporting must never abort a crawl.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, url: &str) -> Result<()>;
}

/// Consumer of accepted page records, invoked once per record as it is
/// produced (streaming), in addition to the record appearing in the returned
/// sequence.
///
/// Errors returned from `on_page` usually mean a downstream persistence
/// failure. They are logged at error level and abandon that page's
/// post-processing, but the crawl proceeds to the next queued URL.
pub trait PageSink: Send + Sync {
    fn on_page(&self, record: &PageRecord, stats: &CrawlStats) -> Result<()>;
}

/// Progress sink that does nothing; used by the simple `crawl_site` API.
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    #[inline(always)]
    fn on_progress(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// Page sink that does nothing; callers then consume the returned records.
#[derive(Debug, Clone, Copy)]
pub struct NoOpPageSink;

impl PageSink for NoOpPageSink {
    #[inline(always)]
    fn on_page(&self, _record: &PageRecord, _stats: &CrawlStats) -> Result<()> {
        Ok(())
    }
}

/// Minimum-quality gate for extracted content: non-empty, not a JS-disabled
/// placeholder, and longer than `min_length` characters. Records failing this
/// are silently dropped, never retried.
#[must_use]
pub(crate) fn passes_quality_gate(content: &str, min_length: usize) -> bool {
    !content.is_empty()
        && !content.contains(JS_DISABLED_MARKER)
        && content.chars().count() > min_length
}
