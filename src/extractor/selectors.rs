//! CSS selector tables for main-content extraction.
//!
//! Parsed once at first access and cached forever. Hardcoded selectors must
//! never fail to parse; if one does, it is a compile-time bug.

use std::sync::LazyLock;

use scraper::Selector;

fn parse(css: &str) -> Selector {
    Selector::parse(css)
        .unwrap_or_else(|e| panic!("BUG: hardcoded CSS selector {css:?} is invalid: {e}"))
}

/// Ordered priority list for locating the main content region: semantic
/// landmarks first, then common CMS and doc-site container classes. The first
/// selector with a match wins.
pub(crate) static MAIN_CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "main",
        "article",
        "[role='main']",
        "#main-content",
        ".main-content",
        ".content",
        ".article-body",
        ".documentation",
        ".doc-content",
        ".post-content",
        "#content",
        ".page-content",
        ".docs-content",
        ".markdown-body",
        ".md-content",
        ".guide-content",
    ]
    .iter()
    .map(|css| parse(css))
    .collect()
});

/// Chrome and boilerplate to strip from the selected region before text
/// extraction. Applied to the region only, so navigation outside the main
/// content never needs stripping in the first place.
pub(crate) static BOILERPLATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse(
        "script, style, nav, footer, aside, form, header, iframe, noscript, \
         .navigation, .sidebar, .ad, .advertisement, .breadcrumb, .toc, \
         .table-of-contents",
    )
});

pub(crate) static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse("title"));

pub(crate) static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse("h1"));

pub(crate) static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse("body"));

pub(crate) static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse("a[href]"));
