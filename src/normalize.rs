//! URL canonicalization for deduplication.
//!
//! Every URL that enters the visited set or the frontier queue passes through
//! [`normalize_url`] first, so two spellings of the same resource collapse to
//! one canonical string.

use url::Url;

/// Normalize a URL string into its canonical form for dedup comparisons.
///
/// - scheme and host are lower-cased (the `url` crate does this on parse)
/// - the path's trailing slash is stripped unless the path is exactly `/`
/// - the query string is preserved, the fragment is always dropped
///
/// This is a pure function and never fails: input that does not parse as a
/// URL is returned trimmed as-is, and the downstream fetch fails naturally.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url.trim()) else {
        return url.trim().to_string();
    };

    parsed.set_fragment(None);

    let path = parsed.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        parsed.set_path(&trimmed);
    }

    parsed.to_string()
}
