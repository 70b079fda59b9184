//! Remote browser session management.
//!
//! [`BrowserSession`] owns the CDP connection to a remote headless Chrome
//! service (a `ws://` endpoint, e.g. browserless). The session follows a
//! simple state machine: Disconnected → Connecting → Connected, with a crash
//! detected during a page operation sending it back to Disconnected via
//! [`BrowserSession::invalidate`]. Reconnects only ever happen inside
//! [`BrowserSession::ensure_connected`], keeping the crawl loop's control
//! flow single-threaded and predictable.
//!
//! Every page visit runs in a fresh incognito browsing context (isolated
//! cookie/storage jar) with request interception that aborts image,
//! stylesheet, font, and media requests, since the crawler only needs text.
//! The context is closed on every exit path.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::config::CrawlConfig;

/// Structured classification of a page-operation failure, determined once at
/// the point the driver signals it. The crawl loop switches on this tag
/// instead of matching error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The target, context, or browser connection went away. The shared
    /// connection must be invalidated so the next URL reconnects.
    Crashed,
    /// Navigation or capture exceeded its deadline.
    Timeout,
    /// Network-level failure reported by the browser.
    NetworkError,
    /// Anything else; treated as "this URL yielded nothing".
    Other,
}

/// Error from a browser connect or page-fetch operation.
#[derive(Debug, Clone)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Wrap a driver error, classifying it by its error text. Classification
    /// happens here, once, and nowhere else.
    pub(crate) fn from_driver(operation: &str, err: &chromiumoxide::error::CdpError) -> Self {
        let message = format!("{operation}: {err}");
        Self::new(classify_driver_message(&message), message)
    }

    fn timeout(operation: &str, after: Duration) -> Self {
        Self::new(
            FetchErrorKind::Timeout,
            format!("{operation} timed out after {}s", after.as_secs()),
        )
    }

    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FetchErrorKind::Crashed => write!(f, "browser crashed: {}", self.message),
            FetchErrorKind::Timeout => write!(f, "timeout: {}", self.message),
            FetchErrorKind::NetworkError => write!(f, "network error: {}", self.message),
            FetchErrorKind::Other => write!(f, "page error: {}", self.message),
        }
    }
}

impl std::error::Error for FetchError {}

/// Map a driver error message onto a [`FetchErrorKind`].
///
/// chromiumoxide reports connection loss in several shapes (closed websocket,
/// dropped command channel, detached target), all of which mean the shared
/// connection is unusable and must be re-established.
fn classify_driver_message(message: &str) -> FetchErrorKind {
    let msg = message.to_lowercase();

    if msg.contains("closed")
        || msg.contains("websocket")
        || msg.contains("channel")
        || msg.contains("detached")
        || msg.contains("browser")
    {
        return FetchErrorKind::Crashed;
    }
    if msg.contains("timeout") || msg.contains("timed out") {
        return FetchErrorKind::Timeout;
    }
    if msg.contains("net::") || msg.contains("dns") || msg.contains("connection") {
        return FetchErrorKind::NetworkError;
    }

    FetchErrorKind::Other
}

/// Bound an async page operation with an explicit deadline.
async fn with_deadline<F, T>(
    operation: F,
    deadline: Duration,
    operation_name: &str,
) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::timeout(operation_name, deadline)),
    }
}

/// Lazily-(re)established connection to the remote browser service.
///
/// Owned by the crawl loop; no internal locking because the loop is
/// single-threaded. An asynchronous disconnect observed by the handler task
/// is only flagged here; the next `ensure_connected` call performs the
/// actual reconnect.
pub struct BrowserSession {
    ws_url: String,
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
    connection_lost: Arc<AtomicBool>,
}

impl BrowserSession {
    #[must_use]
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            browser: None,
            handler_task: None,
            connection_lost: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.browser.is_some() && !self.connection_lost.load(Ordering::SeqCst)
    }

    /// Return immediately if a live connection exists, otherwise attempt one
    /// connect to the configured endpoint. The caller decides whether and
    /// when to retry after a failure.
    pub async fn ensure_connected(&mut self) -> Result<(), FetchError> {
        if self.is_connected() {
            return Ok(());
        }
        self.teardown();

        info!(
            target: "siteharvest::browser",
            "connecting to browser service at {}", self.ws_url
        );
        let (browser, mut handler) = Browser::connect(&self.ws_url)
            .await
            .map_err(|e| FetchError::from_driver("browser connect", &e))?;

        let lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&lost);
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            warn!(
                target: "siteharvest::browser",
                "browser service disconnected; will reconnect on next page"
            );
            flag.store(true, Ordering::SeqCst);
        });

        self.browser = Some(browser);
        self.handler_task = Some(handler_task);
        self.connection_lost = lost;
        info!(target: "siteharvest::browser", "connected to browser service");
        Ok(())
    }

    /// Drop the shared connection so the next `ensure_connected` performs a
    /// fresh connect. Called by the crawl loop when a page operation comes
    /// back tagged [`FetchErrorKind::Crashed`].
    pub fn invalidate(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        self.browser = None;
        self.connection_lost = Arc::new(AtomicBool::new(false));
    }

    /// Visit one URL in a fresh, isolated browsing context and return the
    /// rendered HTML.
    ///
    /// Navigation waits for DOM readiness under the configured timeout, then
    /// a settle delay lets late-rendering content land before capture. The
    /// incognito context is closed whether the visit succeeded or failed.
    pub async fn fetch_page(
        &mut self,
        url: &str,
        config: &CrawlConfig,
    ) -> Result<String, FetchError> {
        let browser = self
            .browser
            .as_mut()
            .ok_or_else(|| FetchError::new(FetchErrorKind::Other, "no live browser connection"))?;

        browser
            .start_incognito_context()
            .await
            .map_err(|e| FetchError::from_driver("create browsing context", &e))?;

        let result = navigate_and_capture(browser, url, config).await;

        if let Err(e) = browser.quit_incognito_context().await {
            warn!(
                target: "siteharvest::browser",
                "failed to close browsing context for {url}: {e}"
            );
        }

        result
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

async fn navigate_and_capture(
    browser: &Browser,
    url: &str,
    config: &CrawlConfig,
) -> Result<String, FetchError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| FetchError::from_driver("open page", &e))?;

    let result = drive_page(&page, url, config).await;

    // Best effort: the incognito context teardown reaps the target anyway.
    if let Err(e) = page.clone().close().await {
        debug!(target: "siteharvest::browser", "page close failed for {url}: {e}");
    }

    result
}

async fn drive_page(page: &Page, url: &str, config: &CrawlConfig) -> Result<String, FetchError> {
    page.set_user_agent(config.user_agent().to_string())
        .await
        .map_err(|e| FetchError::from_driver("set user agent", &e))?;

    block_heavy_resources(page).await?;

    let navigation_timeout = config.navigation_timeout();
    with_deadline(
        async {
            page.goto(url)
                .await
                .map_err(|e| FetchError::from_driver("navigate", &e))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| FetchError::from_driver("wait for navigation", &e))?;
            Ok(())
        },
        navigation_timeout,
        "page navigation",
    )
    .await?;
    debug!(target: "siteharvest::browser", "DOM ready for {url}");

    // Settle delay for late-rendering content (client-side routers, delayed
    // hydration) before the HTML snapshot.
    tokio::time::sleep(config.settle_delay()).await;

    page.content()
        .await
        .map_err(|e| FetchError::from_driver("capture html", &e))
}

/// Abort requests for resource types the crawler never consumes.
///
/// Interception stays active for the lifetime of the page; the spawned
/// responder exits when the page (and with it the event stream) goes away.
async fn block_heavy_resources(page: &Page) -> Result<(), FetchError> {
    page.execute(
        EnableParams::builder()
            .pattern(RequestPattern::builder().url_pattern("*").build())
            .build(),
    )
    .await
    .map_err(|e| FetchError::from_driver("enable request interception", &e))?;

    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(|e| FetchError::from_driver("listen for intercepted requests", &e))?;

    let page = page.clone();
    tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let blocked = matches!(
                event.resource_type,
                ResourceType::Image
                    | ResourceType::Stylesheet
                    | ResourceType::Font
                    | ResourceType::Media
            );
            let sent = if blocked {
                page.execute(FailRequestParams::new(
                    event.request_id.clone(),
                    ErrorReason::BlockedByClient,
                ))
                .await
                .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };
            if sent.is_err() {
                // Page is gone; stop responding.
                break;
            }
        }
    });

    Ok(())
}
