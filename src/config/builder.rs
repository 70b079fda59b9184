//! Fluent builder for [`CrawlConfig`].

use anyhow::{anyhow, Result};
use url::Url;

use super::CrawlConfig;

/// Builder with validation at `build()` time.
///
/// `start_url` is the only required field; everything else has a sensible
/// default (see the constants in the parent module).
///
/// # Example
/// ```
/// use siteharvest::config::CrawlConfig;
///
/// let config = CrawlConfig::builder()
///     .start_url("https://docs.example.com/guide")
///     .additional_path("/guide/faq")
///     .max_pages(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_pages(), Some(50));
/// ```
#[derive(Debug, Default, Clone)]
pub struct CrawlConfigBuilder {
    start_url: Option<String>,
    additional_paths: Vec<String>,
    max_pages: Option<usize>,
    browser_ws_url: Option<String>,
    user_agent: Option<String>,
    navigation_timeout_secs: Option<u64>,
    settle_delay_secs: Option<u64>,
    request_delay_ms: Option<u64>,
    reconnect_backoff_secs: Option<u64>,
    min_content_length: Option<usize>,
}

impl CrawlConfigBuilder {
    #[must_use]
    pub fn start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = Some(url.into());
        self
    }

    /// Add one extra path to resolve against the start URL.
    #[must_use]
    pub fn additional_path(mut self, path: impl Into<String>) -> Self {
        self.additional_paths.push(path.into());
        self
    }

    /// Replace the full set of extra paths.
    #[must_use]
    pub fn additional_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.additional_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the number of accepted page records. Omit for an unbounded run.
    #[must_use]
    pub fn max_pages(mut self, cap: usize) -> Self {
        self.max_pages = Some(cap);
        self
    }

    #[must_use]
    pub fn browser_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.browser_ws_url = Some(ws_url.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn settle_delay_secs(mut self, secs: u64) -> Self {
        self.settle_delay_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn request_delay_ms(mut self, millis: u64) -> Self {
        self.request_delay_ms = Some(millis);
        self
    }

    #[must_use]
    pub fn reconnect_backoff_secs(mut self, secs: u64) -> Self {
        self.reconnect_backoff_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn min_content_length(mut self, chars: usize) -> Self {
        self.min_content_length = Some(chars);
        self
    }

    /// Validate and build the config.
    ///
    /// # Errors
    /// Fails when `start_url` is missing, unparseable, or has no host, or
    /// when `max_pages` is zero.
    pub fn build(self) -> Result<CrawlConfig> {
        let start_url = self
            .start_url
            .ok_or_else(|| anyhow!("start_url is required"))?;

        let parsed =
            Url::parse(&start_url).map_err(|e| anyhow!("invalid start_url '{start_url}': {e}"))?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("start_url '{start_url}' has no host"));
        }

        if self.max_pages == Some(0) {
            return Err(anyhow!("max_pages must be positive; omit it for an unbounded run"));
        }

        let defaults = CrawlConfig::default();
        Ok(CrawlConfig {
            start_url,
            additional_paths: self.additional_paths,
            max_pages: self.max_pages,
            browser_ws_url: self.browser_ws_url.unwrap_or(defaults.browser_ws_url),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            navigation_timeout_secs: self
                .navigation_timeout_secs
                .unwrap_or(defaults.navigation_timeout_secs),
            settle_delay_secs: self.settle_delay_secs.unwrap_or(defaults.settle_delay_secs),
            request_delay_ms: self.request_delay_ms.unwrap_or(defaults.request_delay_ms),
            reconnect_backoff_secs: self
                .reconnect_backoff_secs
                .unwrap_or(defaults.reconnect_backoff_secs),
            min_content_length: self.min_content_length.unwrap_or(defaults.min_content_length),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_url_is_required() {
        assert!(CrawlConfigBuilder::default().build().is_err());
    }

    #[test]
    fn rejects_unparseable_start_url() {
        let err = CrawlConfig::builder().start_url("not a url").build();
        assert!(err.is_err());
    }

    #[test]
    fn rejects_zero_page_cap() {
        let err = CrawlConfig::builder()
            .start_url("https://docs.example.com/guide")
            .max_pages(0)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn defaults_are_applied() {
        let config = CrawlConfig::builder()
            .start_url("https://docs.example.com/guide")
            .build()
            .unwrap();
        assert_eq!(config.navigation_timeout().as_secs(), 60);
        assert_eq!(config.settle_delay().as_secs(), 5);
        assert_eq!(config.request_delay().as_millis(), 1000);
        assert_eq!(config.reconnect_backoff().as_secs(), 15);
        assert_eq!(config.min_content_length(), 100);
        assert_eq!(config.max_pages(), None);
    }

    #[test]
    fn overrides_stick() {
        let config = CrawlConfig::builder()
            .start_url("https://docs.example.com/guide")
            .additional_paths(["/guide/faq", "/reference"])
            .browser_ws_url("ws://localhost:3000")
            .max_pages(2)
            .request_delay_ms(10)
            .build()
            .unwrap();
        assert_eq!(config.additional_paths().len(), 2);
        assert_eq!(config.browser_ws_url(), "ws://localhost:3000");
        assert_eq!(config.max_pages(), Some(2));
    }
}
