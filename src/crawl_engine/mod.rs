//! Breadth-first crawl engine: frontier loop, link discovery, and the sink
//! traits callers implement to observe a run.

mod core;
mod link_processor;
mod types;

pub use self::core::crawl_pages;
pub use link_processor::discover_links;
pub use types::{CrawlStats, NoOpPageSink, NoOpProgress, PageRecord, PageSink, ProgressSink};
