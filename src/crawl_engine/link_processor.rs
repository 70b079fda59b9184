//! Link discovery from captured HTML.
//!
//! Enumerates `a[href]` targets, resolves them against the page URL,
//! normalizes, and keeps only links that are simultaneously unvisited, not
//! already queued, and inside the crawl scope. Dedup across the whole crawl
//! is owned by the caller's visited set; this module only prevents
//! double-enqueue.

use std::collections::{HashSet, VecDeque};

use log::debug;
use scraper::Html;
use url::Url;

use crate::extractor::selectors::ANCHOR_SELECTOR;
use crate::normalize::normalize_url;
use crate::scope::ScopeConfig;

/// Collect the in-scope, unseen links on a page, in document order.
///
/// `page_url` is the (normalized) URL the HTML was captured from; relative
/// hrefs resolve against it. The returned list is itself duplicate-free so
/// the caller can extend the frontier queue directly.
#[must_use]
pub fn discover_links(
    html: &str,
    page_url: &str,
    scope: &ScopeConfig,
    visited: &HashSet<String>,
    queue: &VecDeque<String>,
) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            debug!(target: "siteharvest::links", "unresolvable href on {page_url}: {href}");
            continue;
        };

        let normalized = normalize_url(resolved.as_str());
        if visited.contains(&normalized)
            || queue.contains(&normalized)
            || links.contains(&normalized)
        {
            continue;
        }
        if !scope.is_in_scope(&normalized) {
            continue;
        }
        links.push(normalized);
    }

    links
}
