//! Browser control over CDP (Chrome `DevTools` Protocol).
//!
//! [`BrowserConfig`] is always available so front ends can build it from
//! flags; [`CdpDriver`] needs the `browser` feature and a Chromium binary.

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{Screenshot, UiDriver};
    use crate::result::{CheckError, CheckResult};
    use crate::wait::{LoadState, DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
    use chromiumoxide::element::Element;
    use chromiumoxide::error::CdpError;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokio::time::Instant;

    const IS_VISIBLE_JS: &str = "function() { \
        const s = window.getComputedStyle(this); \
        const r = this.getBoundingClientRect(); \
        return s.visibility !== 'hidden' && s.display !== 'none' && r.width > 0 && r.height > 0; \
    }";
    const TEXT_CONTENT_JS: &str = "function() { return this.textContent || ''; }";
    const IS_CHECKED_JS: &str = "function() { return this.checked === true; }";
    const RESOURCE_COUNT_JS: &str = "performance.getEntriesByType('resource').length";

    fn driver_error(e: impl std::fmt::Display) -> CheckError {
        CheckError::driver(e.to_string())
    }

    /// No matching node is an empty list; anything else is a driver failure
    fn matches_or_empty<T>(found: Result<Vec<T>, CdpError>) -> CheckResult<Vec<T>> {
        match found {
            Ok(found) => Ok(found),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(driver_error(e)),
        }
    }

    /// UiDriver backed by a real Chromium instance
    #[derive(Debug)]
    pub struct CdpDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: CdpPage,
        handler: tokio::task::JoinHandle<()>,
        console: tokio::task::JoinHandle<()>,
    }

    impl CdpDriver {
        /// Launch Chromium and open a blank page
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: &BrowserConfig) -> CheckResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| CheckError::BrowserLaunch { message: e })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| CheckError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handler = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| CheckError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let mut events = page
                .event_listener::<EventConsoleApiCalled>()
                .await
                .map_err(driver_error)?;
            let console = tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    let text = event
                        .args
                        .iter()
                        .filter_map(|arg| arg.value.as_ref())
                        .map(|v| match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    tracing::debug!(target: "tablecheck::browser::console", kind = ?event.r#type, "{text}");
                }
            });

            tracing::info!(headless = config.headless, "browser launched");
            Ok(Self {
                browser: Arc::new(Mutex::new(browser)),
                page,
                handler,
                console,
            })
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns error if the browser does not shut down cleanly
        pub async fn close(self) -> CheckResult<()> {
            self.console.abort();
            let result = self.browser.lock().await.close().await;
            self.handler.abort();
            result.map(|_| ()).map_err(driver_error)
        }

        async fn call_bool(&self, element: &Element, function: &str) -> CheckResult<bool> {
            let returns = element
                .call_js_fn(function, false)
                .await
                .map_err(driver_error)?;
            Ok(returns
                .result
                .value
                .as_ref()
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false))
        }

        async fn resource_count(&self) -> CheckResult<u64> {
            let result = self
                .page
                .evaluate(RESOURCE_COUNT_JS)
                .await
                .map_err(driver_error)?;
            result.into_value::<u64>().map_err(driver_error)
        }

        /// Resolve once no new resource entry appears for the idle threshold
        async fn wait_network_idle(&self) -> CheckResult<()> {
            let idle = Duration::from_millis(NETWORK_IDLE_THRESHOLD_MS);
            let poll = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
            let mut count = self.resource_count().await?;
            let mut quiet_since = Instant::now();
            while quiet_since.elapsed() < idle {
                tokio::time::sleep(poll).await;
                let next = self.resource_count().await?;
                if next != count {
                    count = next;
                    quiet_since = Instant::now();
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UiDriver for CdpDriver {
        type Element = Element;

        async fn navigate(
            &mut self,
            url: &str,
            wait_until: LoadState,
            timeout: Duration,
        ) -> CheckResult<()> {
            let load = async {
                self.page.goto(url).await.map_err(|e| CheckError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                if wait_until == LoadState::NetworkIdle {
                    self.wait_network_idle().await?;
                }
                Ok::<(), CheckError>(())
            };
            tokio::time::timeout(timeout, load)
                .await
                .map_err(|_| CheckError::Navigation {
                    url: url.to_string(),
                    message: format!("no {wait_until} within {}ms", timeout.as_millis()),
                })??;
            tracing::info!(url, %wait_until, "page loaded");
            Ok(())
        }

        async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> CheckResult<Element> {
            let deadline = Instant::now() + timeout;
            let poll = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
            loop {
                // querySelectorAll fails while the document is being replaced
                if let Ok(found) = self.page.find_elements(selector).await {
                    for element in found {
                        if self.call_bool(&element, IS_VISIBLE_JS).await.unwrap_or(false) {
                            return Ok(element);
                        }
                    }
                }
                if Instant::now() >= deadline {
                    return Err(CheckError::timeout(
                        format!("'{selector}' to be visible"),
                        timeout,
                    ));
                }
                tokio::time::sleep(poll).await;
            }
        }

        async fn locate_all(&self, selector: &str) -> CheckResult<Vec<Element>> {
            self.page.find_elements(selector).await.map_err(driver_error)
        }

        async fn locate_within(&self, parent: &Element, selector: &str) -> CheckResult<Vec<Element>> {
            matches_or_empty(parent.find_elements(selector).await)
        }

        async fn is_visible(&self, element: &Element) -> CheckResult<bool> {
            self.call_bool(element, IS_VISIBLE_JS).await
        }

        async fn text_content(&self, element: &Element) -> CheckResult<String> {
            let returns = element
                .call_js_fn(TEXT_CONTENT_JS, false)
                .await
                .map_err(driver_error)?;
            Ok(returns
                .result
                .value
                .as_ref()
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string())
        }

        async fn attribute(&self, element: &Element, name: &str) -> CheckResult<Option<String>> {
            element.attribute(name).await.map_err(driver_error)
        }

        async fn inner_html(&self, element: &Element) -> CheckResult<String> {
            Ok(element
                .inner_html()
                .await
                .map_err(driver_error)?
                .unwrap_or_default())
        }

        async fn click(&self, element: &Element) -> CheckResult<()> {
            element.click().await.map_err(driver_error)?;
            Ok(())
        }

        async fn check(&self, element: &Element) -> CheckResult<()> {
            if !self.call_bool(element, IS_CHECKED_JS).await? {
                self.click(element).await?;
            }
            Ok(())
        }

        async fn uncheck(&self, element: &Element) -> CheckResult<()> {
            if self.call_bool(element, IS_CHECKED_JS).await? {
                self.click(element).await?;
            }
            Ok(())
        }

        async fn wait(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn screenshot(&self) -> CheckResult<Screenshot> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot = self.page.execute(params).await.map_err(driver_error)?;

            use base64::Engine;
            let data = base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(driver_error)?;
            Ok(Screenshot::new(data))
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    mod tests {
        use super::*;

        #[test]
        fn test_no_match_is_empty() {
            let found = matches_or_empty::<u8>(Err(CdpError::NotFound)).unwrap();
            assert!(found.is_empty());
            assert_eq!(matches_or_empty(Ok(vec![1u8, 2])).unwrap(), vec![1, 2]);
        }

        #[test]
        fn test_other_cdp_errors_propagate() {
            let err = matches_or_empty::<u8>(Err(CdpError::Timeout)).unwrap_err();
            assert!(matches!(err, CheckError::Driver { .. }));
        }
    }
}
