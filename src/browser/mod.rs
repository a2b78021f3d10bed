//! Browser session abstraction
//!
//! The crawler only talks to a page through [`BrowserSession`]: navigate, wait,
//! query elements by CSS selector, read their text or attributes, scroll, click
//! and press keys. Two implementations exist:
//!
//! - [`ChromeSession`]: a real Chrome/Chromium driven over the DevTools protocol
//! - [`FixtureBrowser`]: scripted search pages rendered to HTML, used by tests
//!
//! Element handles are only valid until the next action that mutates the page
//! layout. Callers re-query instead of holding handles across a click.

mod chrome;
pub mod fixture;
pub mod selectors;

pub use chrome::ChromeSession;
pub use fixture::{Fault, FixtureActivity, FixtureBrowser, FixtureCard, FixturePage};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Element is no longer attached to the page: {0}")]
    Detached(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A single page in a browser, driven one action at a time
///
/// Lookups that find nothing return `Ok(None)` or an empty `Vec`; errors are
/// reserved for real failures (detached nodes, protocol faults, timeouts).
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Handle to an element on the current page
    type Element: Send + Sync;

    /// Loads a URL in the page
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Waits until the page reports that loading finished, up to `timeout`
    ///
    /// Only meaningful after a navigation; in-page changes such as opening a
    /// result card leave the load state untouched.
    async fn wait_for_settle(&mut self, timeout: Duration) -> BrowserResult<()>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<Self::Element>>;

    /// First descendant of `scope` matching `selector`
    async fn query_in(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> BrowserResult<Option<Self::Element>>;

    /// First element matching `selector`
    async fn query(&self, selector: &str) -> BrowserResult<Option<Self::Element>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn is_visible(&self, element: &Self::Element) -> BrowserResult<bool>;

    /// Rendered text of an element
    async fn text(&self, element: &Self::Element) -> BrowserResult<Option<String>>;

    async fn attribute(&self, element: &Self::Element, name: &str)
        -> BrowserResult<Option<String>>;

    /// Visible text of the whole page body
    async fn page_text(&self) -> BrowserResult<String>;

    /// Scrolls a scrollable element vertically by `dy` pixels
    async fn scroll_by(&mut self, element: &Self::Element, dy: i64) -> BrowserResult<()>;

    async fn scroll_into_view(&mut self, element: &Self::Element) -> BrowserResult<()>;

    async fn click(&mut self, element: &Self::Element) -> BrowserResult<()>;

    /// Sends a key press to the page (e.g. "PageDown")
    async fn press_key(&mut self, key: &str) -> BrowserResult<()>;
}
