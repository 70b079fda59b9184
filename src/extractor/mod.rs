//! Readable main-content extraction from rendered HTML.
//!
//! Operates purely on an already-fetched HTML string, with no network and no
//! browser access, so the whole pipeline is unit-testable in isolation. The
//! main region is located via an ordered selector table
//! ([`selectors::MAIN_CONTENT_SELECTORS`]); boilerplate is stripped from that
//! region only, then text is joined with single-space separation and
//! whitespace-collapsed.

pub(crate) mod selectors;

use std::sync::LazyLock;

use ego_tree::NodeRef;
use log::warn;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

use selectors::{
    BODY_SELECTOR, BOILERPLATE_SELECTOR, H1_SELECTOR, MAIN_CONTENT_SELECTORS, TITLE_SELECTOR,
};

/// Nesting depth cap for the text-collection walk. Real documents sit far
/// below this; pathological input gets truncated instead of overflowing the
/// stack.
const MAX_NESTING_DEPTH: usize = 100;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("BUG: hardcoded whitespace regex is invalid"));

/// Title and flattened text of one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
}

/// Extract `(title, content)` from rendered HTML.
///
/// Title resolution order: `<title>` text (trimmed), then the first `<h1>`,
/// then empty. The main region is the first match from the priority selector
/// list, falling back to `<body>` when nothing matches (logged, since that
/// usually means an unfamiliar site layout). The `url` parameter is used for
/// logging only.
#[must_use]
pub fn extract(html: &str, url: &str) -> ExtractedContent {
    let document = Html::parse_document(html);

    let title = first_text(&document, &TITLE_SELECTOR)
        .or_else(|| first_text(&document, &H1_SELECTOR))
        .unwrap_or_default();

    let region = MAIN_CONTENT_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .or_else(|| {
            warn!(
                target: "siteharvest::extract",
                "no content selector matched for {url}, falling back to body"
            );
            document.select(&BODY_SELECTOR).next()
        });

    let Some(region) = region else {
        return ExtractedContent {
            title,
            content: String::new(),
        };
    };

    let mut raw = String::new();
    collect_text(*region, &mut raw, 0);
    let content = WHITESPACE_RUNS.replace_all(raw.trim(), " ").into_owned();

    ExtractedContent { title, content }
}

fn first_text(document: &Html, selector: &scraper::Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Depth-first text collection that skips boilerplate subtrees entirely.
fn collect_text(node: NodeRef<'_, Node>, out: &mut String, depth: usize) {
    if depth > MAX_NESTING_DEPTH {
        warn!(
            target: "siteharvest::extract",
            "HTML nesting exceeds {MAX_NESTING_DEPTH} levels, truncating text collection"
        );
        return;
    }

    for child in node.children() {
        if let Some(element) = ElementRef::wrap(child) {
            if BOILERPLATE_SELECTOR.matches(&element) {
                continue;
            }
            collect_text(child, out, depth + 1);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_comes_from_title_tag() {
        let html = "<html><head><title> Install Guide </title></head>\
                    <body><h1>Other</h1><main>body text</main></body></html>";
        let extracted = extract(html, "https://example.com/guide");
        assert_eq!(extracted.title, "Install Guide");
    }

    #[test]
    fn title_falls_back_to_h1_then_empty() {
        let html = "<html><body><h1>Heading</h1><main>text</main></body></html>";
        assert_eq!(extract(html, "u").title, "Heading");

        let html = "<html><body><main>text</main></body></html>";
        assert_eq!(extract(html, "u").title, "");
    }

    #[test]
    fn semantic_landmark_wins_over_class_selectors() {
        let html = "<html><body>\
                    <div class='content'>wrong region</div>\
                    <main>right region</main>\
                    </body></html>";
        assert_eq!(extract(html, "u").content, "right region");
    }

    #[test]
    fn selector_priority_is_ordered() {
        let html = "<html><body>\
                    <article>article text</article>\
                    <div id='main-content'>div text</div>\
                    </body></html>";
        assert_eq!(extract(html, "u").content, "article text");
    }

    #[test]
    fn falls_back_to_body_when_no_selector_matches() {
        let html = "<html><body><p>plain body paragraph</p></body></html>";
        assert_eq!(extract(html, "u").content, "plain body paragraph");
    }

    #[test]
    fn boilerplate_is_stripped_from_the_region() {
        let html = "<html><body><main>\
                    <nav>nav links</nav>\
                    <p>kept paragraph</p>\
                    <script>var x = 1;</script>\
                    <div class='sidebar'>sidebar junk</div>\
                    <aside>aside junk</aside>\
                    <div class='toc'>toc</div>\
                    <p>second paragraph</p>\
                    <footer>footer junk</footer>\
                    </main></body></html>";
        let content = extract(html, "u").content;
        assert_eq!(content, "kept paragraph second paragraph");
    }

    #[test]
    fn boilerplate_outside_the_region_is_irrelevant() {
        let html = "<html><body>\
                    <nav>site nav</nav>\
                    <main><p>only this</p></main>\
                    <footer>site footer</footer>\
                    </body></html>";
        assert_eq!(extract(html, "u").content, "only this");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        let html = "<html><body><main><p>a\n\n   b</p>\t<p>c</p></main></body></html>";
        assert_eq!(extract(html, "u").content, "a b c");
    }

    #[test]
    fn empty_region_yields_empty_content() {
        let html = "<html><body><main></main></body></html>";
        let extracted = extract(html, "u");
        assert_eq!(extracted.content, "");
    }

    #[test]
    fn nested_boilerplate_subtrees_are_skipped_entirely() {
        let html = "<html><body><main>\
                    <div class='navigation'><ul><li>deep nav item</li></ul></div>\
                    <p>real text</p>\
                    </main></body></html>";
        assert_eq!(extract(html, "u").content, "real text");
    }
}
