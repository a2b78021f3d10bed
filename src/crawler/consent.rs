//! Cookie-consent dismissal
//!
//! Best-effort: the poll gives up silently once its deadline passes and the
//! session continues either way.

use crate::browser::{selectors, BrowserResult, BrowserSession};
use crate::config::SearchConfig;
use tokio::time::Instant;

/// Polls for a visible consent button and clicks it
///
/// Labels are tried in configured order and matched case-insensitively
/// against each button's accessible label or text. Returns true if a button
/// was clicked.
pub async fn dismiss_consent<B: BrowserSession>(browser: &mut B, config: &SearchConfig) -> bool {
    let deadline = Instant::now() + config.consent_timeout();

    loop {
        match find_consent_button(browser, &config.consent_labels).await {
            Ok(Some((button, label))) => match browser.click(&button).await {
                Ok(()) => {
                    tracing::info!("Accepted cookie consent ({})", label);
                    return true;
                }
                Err(e) => tracing::debug!("Consent click failed: {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::debug!("Consent lookup failed: {}", e),
        }

        if Instant::now() >= deadline {
            tracing::debug!("No consent dialog found");
            return false;
        }
        tokio::time::sleep(config.consent_poll_interval()).await;
    }
}

async fn find_consent_button<B: BrowserSession>(
    browser: &B,
    labels: &[String],
) -> BrowserResult<Option<(B::Element, String)>> {
    let buttons = browser.query_all(selectors::CONSENT_BUTTON).await?;

    let mut named = Vec::with_capacity(buttons.len());
    for button in buttons {
        let name = match browser.attribute(&button, "aria-label").await? {
            Some(label) if !label.trim().is_empty() => label,
            _ => browser.text(&button).await?.unwrap_or_default(),
        };
        named.push((button, name.trim().to_lowercase()));
    }

    for label in labels {
        let wanted = label.to_lowercase();
        for index in 0..named.len() {
            let (button, name) = &named[index];
            if name.contains(&wanted) && browser.is_visible(button).await? {
                let (button, _) = named.swap_remove(index);
                return Ok(Some((button, label.clone())));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{FixtureBrowser, FixturePage};

    const URL: &str = "https://maps.test/search/Bar+en+Centro";

    fn config() -> SearchConfig {
        SearchConfig {
            consent_timeout: 0,
            consent_poll_interval: 1,
            ..SearchConfig::default()
        }
    }

    async fn loaded(page: FixturePage) -> FixtureBrowser {
        let mut browser = FixtureBrowser::new().with_page(URL, page);
        browser.navigate(URL).await.unwrap();
        browser
    }

    #[tokio::test]
    async fn test_accepts_consent_dialog() {
        let mut browser = loaded(FixturePage::new(vec![]).with_consent("Aceptar todo")).await;

        assert!(dismiss_consent(&mut browser, &config()).await);
        assert_eq!(browser.activity().consent_dismissed, 1);
    }

    #[tokio::test]
    async fn test_label_match_ignores_case() {
        let mut browser = loaded(FixturePage::new(vec![]).with_consent("AGREE")).await;

        assert!(dismiss_consent(&mut browser, &config()).await);
    }

    #[tokio::test]
    async fn test_no_dialog_gives_up() {
        let mut browser = loaded(FixturePage::new(vec![])).await;

        assert!(!dismiss_consent(&mut browser, &config()).await);
        assert_eq!(browser.activity().consent_dismissed, 0);
    }

    #[tokio::test]
    async fn test_unknown_label_is_not_clicked() {
        let mut browser = loaded(FixturePage::new(vec![]).with_consent("Accept all")).await;

        let config = SearchConfig {
            consent_timeout: 5,
            ..config()
        };
        assert!(!dismiss_consent(&mut browser, &config).await);
        assert_eq!(browser.activity().consent_dismissed, 0);
    }
}
