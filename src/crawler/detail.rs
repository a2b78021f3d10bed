//! Waiting for a clicked card's detail view
//!
//! Opening a card does not navigate, so the page's load state says nothing
//! about the panel. Instead the panel text is polled until it differs from
//! what was shown before the click and reads the same on two consecutive
//! checks.

use crate::browser::BrowserSession;
use crate::extract::detail_view_text;
use std::time::Duration;
use tokio::time::Instant;

/// Polls the detail panel until it shows new, stable content
///
/// `previous` is the panel text captured before the click, `None` when no
/// panel was open. Returns false if the panel has not settled by `timeout`.
pub async fn wait_for_detail<B: BrowserSession>(
    browser: &B,
    previous: Option<&str>,
    timeout: Duration,
    poll: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    let mut last_seen: Option<String> = None;

    loop {
        let current = detail_view_text(browser).await;

        if let Some(text) = &current {
            if previous != Some(text.as_str()) && last_seen.as_deref() == Some(text.as_str()) {
                return true;
            }
        }
        last_seen = current;

        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(poll).await;
    }
}

/// True when the panel still shows exactly what it showed before the click
pub async fn still_showing<B: BrowserSession>(browser: &B, previous: Option<&str>) -> bool {
    match previous {
        Some(previous) => detail_view_text(browser).await.as_deref() == Some(previous),
        None => false,
    }
}
