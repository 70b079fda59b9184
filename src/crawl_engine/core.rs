//! The frontier crawl loop.
//!
//! Breadth-first over a FIFO queue seeded from the configured start URL.
//! Each popped URL is normalized, deduped against the visited set, fetched
//! through the shared [`BrowserSession`], extracted, quality-gated, and mined
//! for new in-scope links. Page failures never abort the run; only an invalid
//! start URL does.

use std::collections::{HashSet, VecDeque};

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use url::Url;

use crate::browser::{BrowserSession, FetchErrorKind};
use crate::config::CrawlConfig;
use crate::extractor;
use crate::normalize::normalize_url;
use crate::scope::ScopeConfig;

use super::link_processor::discover_links;
use super::types::{passes_quality_gate, CrawlStats, PageRecord, PageSink, ProgressSink};

/// Crawl from the configured start URL and return the accepted page records
/// in the order they were scraped.
///
/// `progress` is pinged once per popped URL; `sink` receives each accepted
/// record as it is produced, alongside a stats snapshot. A browser service
/// that is unreachable at startup ends the run early with an empty result
/// rather than an error.
///
/// # Errors
/// Only configuration-level problems error out: a start URL that does not
/// parse as an absolute URL.
pub async fn crawl_pages<P, S>(config: CrawlConfig, progress: P, sink: S) -> Result<Vec<PageRecord>>
where
    P: ProgressSink,
    S: PageSink,
{
    let start = Url::parse(config.start_url())
        .map_err(|e| anyhow!("invalid start URL '{}': {e}", config.start_url()))?;
    let scope = ScopeConfig::from_seed(&start, config.additional_paths());
    info!(
        target: "siteharvest::crawl",
        "starting crawl of {} ({} allowed path prefixes)",
        config.start_url(),
        scope.allowed_path_prefixes().len()
    );

    let mut queue = seed_queue(&start, &config);
    let mut visited: HashSet<String> = HashSet::new();
    let mut scraped: Vec<PageRecord> = Vec::new();

    let mut session = BrowserSession::new(config.browser_ws_url());
    if let Err(e) = session.ensure_connected().await {
        error!(
            target: "siteharvest::crawl",
            "browser service unreachable at startup, ending run: {e}"
        );
        return Ok(scraped);
    }

    loop {
        if let Some(cap) = config.max_pages() {
            if scraped.len() >= cap {
                info!(target: "siteharvest::crawl", "reached page cap of {cap}");
                break;
            }
        }
        let Some(next) = queue.pop_front() else {
            break;
        };

        let url = normalize_url(&next);
        if !visited.insert(url.clone()) {
            continue;
        }

        process_url(
            &url,
            &config,
            &scope,
            &mut session,
            &visited,
            &mut queue,
            &mut scraped,
            &progress,
            &sink,
        )
        .await;

        // Fixed pacing between page visits; duplicate skips above do not pay it.
        tokio::time::sleep(config.request_delay()).await;
    }

    info!(
        target: "siteharvest::crawl",
        "crawl finished: scraped {} pages ({} visited, {} still queued)",
        scraped.len(),
        visited.len(),
        queue.len()
    );
    Ok(scraped)
}

/// Build the initial frontier: the start URL plus every additional path that
/// resolves to the same host, normalized and duplicate-free.
fn seed_queue(start: &Url, config: &CrawlConfig) -> VecDeque<String> {
    let mut queue = VecDeque::new();
    queue.push_back(normalize_url(start.as_str()));

    for path in config.additional_paths() {
        match start.join(path) {
            Ok(joined) if joined.host_str() == start.host_str() => {
                let url = normalize_url(joined.as_str());
                if !queue.contains(&url) {
                    queue.push_back(url);
                }
            }
            Ok(joined) => {
                warn!(
                    target: "siteharvest::crawl",
                    "additional path '{path}' resolves off-host to {joined}, ignoring"
                );
            }
            Err(e) => {
                warn!(
                    target: "siteharvest::crawl",
                    "cannot resolve additional path '{path}': {e}"
                );
            }
        }
    }

    queue
}

/// Visit one normalized, never-before-seen URL: fetch, extract, gate, mine
/// links, and notify the sinks. All failures are logged and absorbed.
#[allow(clippy::too_many_arguments)]
async fn process_url<P, S>(
    url: &str,
    config: &CrawlConfig,
    scope: &ScopeConfig,
    session: &mut BrowserSession,
    visited: &HashSet<String>,
    queue: &mut VecDeque<String>,
    scraped: &mut Vec<PageRecord>,
    progress: &P,
    sink: &S,
) where
    P: ProgressSink,
    S: PageSink,
{
    if let Err(e) = progress.on_progress(url) {
        debug!(target: "siteharvest::crawl", "progress sink error for {url}: {e}");
    }

    if !scope.is_in_scope(url) {
        info!(target: "siteharvest::crawl", "skipping out-of-scope url: {url}");
        return;
    }

    if session.ensure_connected().await.is_err() {
        warn!(
            target: "siteharvest::crawl",
            "browser service unreachable, backing off {}s before retry",
            config.reconnect_backoff().as_secs()
        );
        tokio::time::sleep(config.reconnect_backoff()).await;
        if let Err(e) = session.ensure_connected().await {
            warn!(target: "siteharvest::crawl", "still unreachable, skipping {url}: {e}");
            return;
        }
    }

    match config.max_pages() {
        Some(cap) => info!(
            target: "siteharvest::crawl",
            "crawling {url} ({}/{cap} scraped, {} queued)",
            scraped.len(),
            queue.len()
        ),
        None => info!(
            target: "siteharvest::crawl",
            "crawling {url} ({} scraped, {} queued)",
            scraped.len(),
            queue.len()
        ),
    }

    let html = match session.fetch_page(url, config).await {
        Ok(html) => html,
        Err(e) => {
            if e.kind() == FetchErrorKind::Crashed {
                error!(
                    target: "siteharvest::crawl",
                    "browser connection lost while fetching {url}: {e}"
                );
                session.invalidate();
            } else {
                warn!(target: "siteharvest::crawl", "failed to fetch {url}: {e}");
            }
            return;
        }
    };

    let extracted = extractor::extract(&html, url);
    let record = if passes_quality_gate(&extracted.content, config.min_content_length()) {
        Some(PageRecord {
            url: url.to_string(),
            title: extracted.title,
            content: extracted.content,
        })
    } else {
        warn!(target: "siteharvest::crawl", "no meaningful content on {url}");
        None
    };

    let new_links = discover_links(&html, url, scope, visited, queue);
    let found = new_links.len();
    if found > 0 {
        debug!(target: "siteharvest::links", "queued {found} new links from {url}");
    }
    queue.extend(new_links);

    if let Some(record) = record {
        let stats = CrawlStats {
            visited: visited.len(),
            queued: queue.len(),
            scraped: scraped.len() + 1,
            discovered: visited.len() + queue.len(),
            new_links: found,
        };
        if let Err(e) = sink.on_page(&record, &stats) {
            error!(target: "siteharvest::crawl", "page sink failed for {url}: {e}");
        }
        scraped.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_paths(paths: &[&str]) -> CrawlConfig {
        CrawlConfig::builder()
            .start_url("https://docs.example.com/guide")
            .additional_paths(paths.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn seed_queue_contains_start_and_joined_paths() {
        let config = config_with_paths(&["/guide/faq", "/reference"]);
        let start = Url::parse(config.start_url()).unwrap();
        let queue = seed_queue(&start, &config);
        assert_eq!(
            queue,
            [
                "https://docs.example.com/guide",
                "https://docs.example.com/guide/faq",
                "https://docs.example.com/reference",
            ]
        );
    }

    #[test]
    fn seed_queue_drops_off_host_paths() {
        let config = config_with_paths(&["https://other.example.com/guide", "/guide/faq"]);
        let start = Url::parse(config.start_url()).unwrap();
        let queue = seed_queue(&start, &config);
        assert_eq!(
            queue,
            [
                "https://docs.example.com/guide",
                "https://docs.example.com/guide/faq",
            ]
        );
    }

    #[test]
    fn seed_queue_is_duplicate_free() {
        let config = config_with_paths(&["/guide", "/guide/"]);
        let start = Url::parse(config.start_url()).unwrap();
        let queue = seed_queue(&start, &config);
        assert_eq!(queue, ["https://docs.example.com/guide"]);
    }

    #[tokio::test]
    async fn invalid_start_url_is_a_hard_error() {
        let config = CrawlConfig {
            start_url: "not a url".to_string(),
            ..CrawlConfig::default()
        };
        let result = crawl_pages(
            config,
            super::super::types::NoOpProgress,
            super::super::types::NoOpPageSink,
        )
        .await;
        assert!(result.is_err());
    }
}
