//! Pagination driver: reveals more result cards before enumeration
//!
//! Each pulse scrolls the feed container by a fixed step and waits for new
//! cards to render. Without a feed the pulse degrades to a PageDown key press.

use crate::browser::{selectors, BrowserResult, BrowserSession};
use crate::config::{PaginationMode, SearchConfig};

/// Runs the configured scroll pulses and returns the visible card count
///
/// In `fixed` mode every pulse runs. In `until-stable` mode pagination stops
/// early once the card count has not grown for `stable-pulses` consecutive
/// pulses; `scroll-pulses` stays the upper bound. Pulse failures are logged
/// and never abort pagination.
pub async fn reveal_more<B: BrowserSession>(browser: &mut B, config: &SearchConfig) -> usize {
    let mut last_count = count_cards(browser).await;
    let mut unchanged = 0;

    for pulse in 1..=config.scroll_pulses {
        if let Err(e) = pulse_once(browser, config.scroll_step).await {
            tracing::debug!("Scroll pulse {} failed: {}", pulse, e);
        }
        tokio::time::sleep(config.scroll_settle()).await;

        if config.pagination == PaginationMode::UntilStable {
            let count = count_cards(browser).await;
            if count > last_count {
                unchanged = 0;
            } else {
                unchanged += 1;
            }
            last_count = count;

            if unchanged >= config.stable_pulses {
                tracing::debug!(
                    "Card count stable at {} after {} pulses, stopping",
                    count,
                    pulse
                );
                return count;
            }
        }
    }

    count_cards(browser).await
}

async fn pulse_once<B: BrowserSession>(browser: &mut B, step: i64) -> BrowserResult<()> {
    let feed = match browser.query(selectors::FEED).await {
        Ok(feed) => feed,
        Err(e) => {
            tracing::debug!("Feed lookup failed: {}", e);
            None
        }
    };

    match feed {
        Some(feed) => match browser.scroll_by(&feed, step).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!("Feed scroll failed, pressing {}: {}", selectors::PAGE_DOWN, e);
                browser.press_key(selectors::PAGE_DOWN).await
            }
        },
        None => browser.press_key(selectors::PAGE_DOWN).await,
    }
}

async fn count_cards<B: BrowserSession>(browser: &B) -> usize {
    match browser.query_all(selectors::CARD).await {
        Ok(cards) => cards.len(),
        Err(e) => {
            tracing::debug!("Card count failed: {}", e);
            0
        }
    }
}
