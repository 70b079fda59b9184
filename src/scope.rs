//! Domain/path scope filtering for discovered links.
//!
//! A crawl run is bounded by the seed URL's host plus a set of allowed path
//! prefixes. Other hosts, paths outside the prefixes, and a fixed denylist of
//! non-content endpoints are all rejected before any fetch.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use log::debug;
use regex::{RegexSet, RegexSetBuilder};
use url::Url;

/// Path patterns that never yield crawlable content: search and auth pages,
/// API and download endpoints, binary/media extensions, print/share/export
/// views. Matched case-insensitively against the URL path.
static PATH_DENYLIST: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSetBuilder::new([
        r"/search",
        r"/login",
        r"/logout",
        r"/api/",
        r"/download/",
        r"\.pdf$",
        r"\.zip$",
        r"\.exe$",
        r"\.dmg$",
        r"\.jpg$",
        r"\.png$",
        r"/print/",
        r"/share/",
        r"/export/",
    ])
    .case_insensitive(true)
    .build()
    .expect("BUG: hardcoded denylist pattern is invalid")
});

/// Immutable scope boundary for one crawl run, computed once from the seed
/// URL and the caller-supplied extra paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfig {
    allowed_domain: String,
    allowed_path_prefixes: BTreeSet<String>,
}

impl ScopeConfig {
    /// Compute the scope from the seed URL plus additional path prefixes.
    ///
    /// The seed's own path (trailing slash stripped, `/`-prefixed) is always
    /// an allowed prefix. Each additional path is merged in only if it starts
    /// with `/`; all prefixes are stored trailing-slash-stripped.
    #[must_use]
    pub fn from_seed(seed: &Url, additional_paths: &[String]) -> Self {
        let allowed_domain = seed.host_str().unwrap_or_default().to_string();

        let mut base_path = seed.path().trim_end_matches('/').to_string();
        if !base_path.starts_with('/') {
            base_path.insert(0, '/');
        }

        let mut allowed_path_prefixes = BTreeSet::new();
        allowed_path_prefixes.insert(base_path.trim_end_matches('/').to_string());
        for path in additional_paths {
            if path.starts_with('/') {
                allowed_path_prefixes.insert(path.trim_end_matches('/').to_string());
            }
        }

        Self {
            allowed_domain,
            allowed_path_prefixes,
        }
    }

    #[must_use]
    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    #[must_use]
    pub fn allowed_path_prefixes(&self) -> &BTreeSet<String> {
        &self.allowed_path_prefixes
    }

    /// Decide whether a URL is eligible to crawl.
    ///
    /// All rules must pass: exact host match (no subdomains), path under one
    /// of the allowed prefixes, no fragment component (a raw fragment marks a
    /// same-page anchor), and no denylist hit on the path. Deterministic and
    /// side-effect free.
    #[must_use]
    pub fn is_in_scope(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if parsed.host_str().unwrap_or_default() != self.allowed_domain {
            return false;
        }

        let path = parsed.path();
        if !self
            .allowed_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return false;
        }

        if parsed.fragment().is_some() {
            return false;
        }

        if PATH_DENYLIST.is_match(path) {
            debug!(target: "siteharvest::scope", "denylist match for path: {path}");
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> ScopeConfig {
        let seed = Url::parse("https://docs.example.com/guide").unwrap();
        ScopeConfig::from_seed(&seed, &["/guide/faq/".to_string()])
    }

    #[test]
    fn seed_path_and_extra_prefixes_are_merged() {
        let s = scope();
        assert_eq!(s.allowed_domain(), "docs.example.com");
        assert!(s.allowed_path_prefixes().contains("/guide"));
        assert!(s.allowed_path_prefixes().contains("/guide/faq"));
    }

    #[test]
    fn relative_additional_paths_are_ignored_for_prefixes() {
        let seed = Url::parse("https://docs.example.com/guide").unwrap();
        let s = ScopeConfig::from_seed(&seed, &["faq".to_string()]);
        assert_eq!(s.allowed_path_prefixes().len(), 1);
    }

    #[test]
    fn root_seed_allows_everything_on_host() {
        let seed = Url::parse("https://docs.example.com/").unwrap();
        let s = ScopeConfig::from_seed(&seed, &[]);
        assert!(s.is_in_scope("https://docs.example.com/anything/here"));
    }

    #[test]
    fn rejects_other_hosts_and_subdomains() {
        let s = scope();
        assert!(!s.is_in_scope("https://example.com/guide"));
        assert!(!s.is_in_scope("https://api.docs.example.com/guide"));
    }

    #[test]
    fn rejects_paths_outside_prefixes() {
        let s = scope();
        assert!(!s.is_in_scope("https://docs.example.com/blog/post"));
        assert!(s.is_in_scope("https://docs.example.com/guide/install"));
    }

    #[test]
    fn rejects_fragments() {
        let s = scope();
        assert!(!s.is_in_scope("https://docs.example.com/guide#intro"));
    }

    #[test]
    fn denylist_rejects_non_content_paths() {
        let s = scope();
        for url in [
            "https://docs.example.com/guide/search",
            "https://docs.example.com/guide/login",
            "https://docs.example.com/guide/api/v1",
            "https://docs.example.com/guide/download/tool",
            "https://docs.example.com/guide/manual.PDF",
            "https://docs.example.com/guide/logo.png",
            "https://docs.example.com/guide/print/page",
        ] {
            assert!(!s.is_in_scope(url), "expected denylist rejection: {url}");
        }
    }

    #[test]
    fn is_referentially_transparent() {
        let s = scope();
        let url = "https://docs.example.com/guide/install";
        assert_eq!(s.is_in_scope(url), s.is_in_scope(url));
    }
}
