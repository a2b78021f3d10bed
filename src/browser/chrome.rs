//! Chrome/Chromium session over the DevTools protocol
//!
//! Launches a browser process, spawns the protocol handler on a tokio task and
//! drives a single page.

use crate::browser::{BrowserError, BrowserResult, BrowserSession};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Interval between `document.readyState` polls
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

const IS_VISIBLE_FN: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none'; \
}";

impl From<CdpError> for BrowserError {
    fn from(err: CdpError) -> Self {
        match err {
            CdpError::Timeout => BrowserError::Timeout {
                what: "browser response".to_string(),
                after: Duration::ZERO,
            },
            other => BrowserError::Protocol(other.to_string()),
        }
    }
}

/// A launched Chrome process with one open page
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launches Chrome according to the browser configuration
    ///
    /// Failing to launch is fatal for a run; callers propagate the error.
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(Duration::from_millis(config.navigation_timeout));

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        tracing::info!(
            "Browser launched ({})",
            if config.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Closes the browser process and waits for the handler to finish
    pub async fn close(mut self) -> BrowserResult<()> {
        self.browser.close().await?;
        self.browser
            .wait()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.handler.abort();
        Ok(())
    }

    async fn ready_state(&self) -> BrowserResult<Option<String>> {
        let result = self.page.evaluate("document.readyState").await?;
        Ok(result
            .value()
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_settle(&mut self, timeout: Duration) -> BrowserResult<()> {
        let poll = async {
            loop {
                if self.ready_state().await?.as_deref() == Some("complete") {
                    return Ok::<(), BrowserError>(());
                }
                tokio::time::sleep(READY_POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout {
                what: "page to settle".to_string(),
                after: timeout,
            }),
        }
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn query_in(&self, scope: &Element, selector: &str) -> BrowserResult<Option<Element>> {
        Ok(scope.find_elements(selector).await?.into_iter().next())
    }

    async fn is_visible(&self, element: &Element) -> BrowserResult<bool> {
        let returns = element.call_js_fn(IS_VISIBLE_FN, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn text(&self, element: &Element) -> BrowserResult<Option<String>> {
        Ok(element.inner_text().await?)
    }

    async fn attribute(&self, element: &Element, name: &str) -> BrowserResult<Option<String>> {
        Ok(element.attribute(name).await?)
    }

    async fn page_text(&self) -> BrowserResult<String> {
        let result = self
            .page
            .evaluate("document.body ? document.body.innerText : ''")
            .await?;
        Ok(result
            .value()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }

    async fn scroll_by(&mut self, element: &Element, dy: i64) -> BrowserResult<()> {
        let function = format!("function() {{ this.scrollBy(0, {}); }}", dy);
        element.call_js_fn(function, false).await?;
        Ok(())
    }

    async fn scroll_into_view(&mut self, element: &Element) -> BrowserResult<()> {
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&mut self, element: &Element) -> BrowserResult<()> {
        element.click().await?;
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> BrowserResult<()> {
        let body = self.page.find_element("body").await?;
        body.press_key(key).await?;
        Ok(())
    }
}
