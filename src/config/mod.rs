//! Crawl configuration.
//!
//! [`CrawlConfig`] captures everything one `crawl_site` run needs: the seed
//! URL and extra path prefixes, the page cap, the remote browser endpoint,
//! and the timing knobs. Values are immutable for the life of a run; use
//! [`CrawlConfig::builder`] to construct one.

mod builder;

pub use builder::CrawlConfigBuilder;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable naming the remote browser websocket endpoint.
pub const BROWSER_WS_URL_ENV: &str = "BROWSER_WS_URL";

/// Default remote browser endpoint when [`BROWSER_WS_URL_ENV`] is unset.
pub const DEFAULT_BROWSER_WS_URL: &str = "ws://browser:3000";

/// Default user agent presented to crawled sites.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub(crate) const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;
pub(crate) const DEFAULT_SETTLE_DELAY_SECS: u64 = 5;
pub(crate) const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub(crate) const DEFAULT_RECONNECT_BACKOFF_SECS: u64 = 15;
pub(crate) const DEFAULT_MIN_CONTENT_LENGTH: usize = 100;

/// Configuration for one crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Absolute seed URL; its host bounds the crawl's domain scope and its
    /// path is the base allowed prefix.
    pub(crate) start_url: String,
    /// Extra path prefixes resolved against the seed URL. Paths starting
    /// with `/` also widen the allowed-prefix set.
    pub(crate) additional_paths: Vec<String>,
    /// Cap on accepted page records; `None` means unbounded.
    pub(crate) max_pages: Option<usize>,
    /// Websocket endpoint of the remote browser service.
    pub(crate) browser_ws_url: String,
    pub(crate) user_agent: String,
    /// Deadline for page navigation (goto + DOM ready).
    pub(crate) navigation_timeout_secs: u64,
    /// Post-navigation delay for late-rendering content.
    pub(crate) settle_delay_secs: u64,
    /// Fixed pacing delay between loop iterations.
    pub(crate) request_delay_ms: u64,
    /// Back-off before the single reconnect retry.
    pub(crate) reconnect_backoff_secs: u64,
    /// Extracted content at or below this length is dropped.
    pub(crate) min_content_length: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            additional_paths: Vec::new(),
            max_pages: None,
            browser_ws_url: std::env::var(BROWSER_WS_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BROWSER_WS_URL.to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            reconnect_backoff_secs: DEFAULT_RECONNECT_BACKOFF_SECS,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
        }
    }
}

impl CrawlConfig {
    /// Start building a config with the fluent builder.
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }

    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    #[must_use]
    pub fn additional_paths(&self) -> &[String] {
        &self.additional_paths
    }

    #[must_use]
    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    #[must_use]
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    #[must_use]
    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_secs(self.reconnect_backoff_secs)
    }

    #[must_use]
    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }
}
