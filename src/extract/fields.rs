//! Fallback chains that read one candidate out of an opened detail view
//!
//! Each field is read independently. A lookup error (missing element, node
//! detached mid-read) is logged at debug level and leaves only that field
//! empty; [`extract_candidate`] itself cannot fail.

use crate::browser::{selectors, BrowserResult, BrowserSession};
use crate::extract::cleanup::{clean_address, clean_name, is_placeholder_heading, is_results_label};
use crate::extract::phone::{find_phone_in_text, phone_from_label};
use crate::model::{Candidate, PhoneNumber};

/// Extracts name, address and phone for the card whose detail view is open
///
/// `card` is a freshly resolved handle to the clicked result card, if it could
/// still be found after the click.
pub async fn extract_candidate<B: BrowserSession>(
    browser: &B,
    card: Option<&B::Element>,
) -> Candidate {
    let name = extract_name(browser, card).await;
    let address = extract_address(browser).await;
    let phone = extract_phone(browser).await;

    Candidate {
        name,
        address,
        phone,
    }
}

async fn extract_name<B: BrowserSession>(browser: &B, card: Option<&B::Element>) -> Option<String> {
    let from_card = match card {
        Some(card) => name_from_card(browser, card).await,
        None => None,
    };

    let raw = match from_card {
        Some(name) => Some(name),
        None => name_from_heading(browser).await,
    };

    raw.map(|name| clean_name(&name))
}

/// Card headline first, then any labelled element inside the card
async fn name_from_card<B: BrowserSession>(browser: &B, card: &B::Element) -> Option<String> {
    if let Some(headline) = lookup(browser.query_in(card, selectors::CARD_HEADLINE).await, "card headline") {
        if let Some(text) = read_text(browser, &headline).await {
            return Some(text);
        }
    }

    let labelled = lookup(browser.query_in(card, selectors::LABELLED).await, "card label")?;
    label_or_text(browser, &labelled).await
}

/// First heading that is not a generic list title, detail panel first
async fn name_from_heading<B: BrowserSession>(browser: &B) -> Option<String> {
    let mut headings = Vec::new();

    if let Some(panel) = detail_panel(browser).await {
        if let Some(heading) = lookup(
            browser.query_in(&panel, selectors::PAGE_HEADING).await,
            "panel heading",
        ) {
            headings.push(heading);
        }
    }

    match browser.query_all(selectors::PAGE_HEADING).await {
        Ok(found) => headings.extend(found),
        Err(e) => tracing::debug!("Page heading lookup failed: {}", e),
    }

    for heading in &headings {
        if let Some(text) = read_text(browser, heading).await {
            if !is_placeholder_heading(&text) {
                return Some(text);
            }
        }
    }

    None
}

async fn extract_address<B: BrowserSession>(browser: &B) -> Option<String> {
    let element = lookup(browser.query(selectors::ADDRESS).await, "address")?;
    let raw = label_or_text(browser, &element).await?;
    clean_address(&raw)
}

/// Labelled phone field first, then the visible detail text
async fn extract_phone<B: BrowserSession>(browser: &B) -> Option<PhoneNumber> {
    if let Some(element) = lookup(browser.query(selectors::PHONE).await, "phone field") {
        if let Some(phone) = label_or_text(browser, &element)
            .await
            .as_deref()
            .and_then(phone_from_label)
        {
            return Some(phone);
        }
    }

    let text = detail_text(browser).await?;
    find_phone_in_text(&text)
}

/// The place detail panel, skipping the results list when both are rendered
pub async fn detail_panel<B: BrowserSession>(browser: &B) -> Option<B::Element> {
    let panels = match browser.query_all(selectors::DETAIL_PANEL).await {
        Ok(panels) => panels,
        Err(e) => {
            tracing::debug!("Lookup of detail panel failed: {}", e);
            return None;
        }
    };

    for panel in panels {
        match browser.attribute(&panel, "aria-label").await {
            Ok(Some(label)) if is_results_label(&label) => {}
            Ok(_) => return Some(panel),
            Err(e) => tracing::debug!("Reading panel label failed: {}", e),
        }
    }

    None
}

/// Whitespace-collapsed text of the detail panel, if one is open
pub async fn detail_view_text<B: BrowserSession>(browser: &B) -> Option<String> {
    let panel = detail_panel(browser).await?;
    read_text(browser, &panel).await
}

/// Text of the detail panel, or of the whole page when no panel is found
async fn detail_text<B: BrowserSession>(browser: &B) -> Option<String> {
    if let Some(text) = detail_view_text(browser).await {
        return Some(text);
    }

    match browser.page_text().await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!("Reading page text failed: {}", e);
            None
        }
    }
}

/// The element's `aria-label`, falling back to its rendered text
async fn label_or_text<B: BrowserSession>(browser: &B, element: &B::Element) -> Option<String> {
    match browser.attribute(element, "aria-label").await {
        Ok(Some(label)) if !label.trim().is_empty() => return Some(label.trim().to_string()),
        Ok(_) => {}
        Err(e) => tracing::debug!("Reading aria-label failed: {}", e),
    }
    read_text(browser, element).await
}

/// Trimmed, non-empty text of an element
async fn read_text<B: BrowserSession>(browser: &B, element: &B::Element) -> Option<String> {
    match browser.text(element).await {
        Ok(text) => text
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::debug!("Reading element text failed: {}", e);
            None
        }
    }
}

/// Flattens a lookup result, logging errors instead of propagating them
fn lookup<T>(result: BrowserResult<Option<T>>, what: &str) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            tracing::debug!("Lookup of {} failed: {}", what, e);
            None
        }
    }
}
