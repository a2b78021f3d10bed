//! CSS selectors for the map-search result markup
//!
//! The markup is generated and changes without notice, so each field has a
//! selector list; the extractor tries them in the order written here.

/// Scrollable container holding the result cards
pub const FEED: &str = "div[role='feed']";

/// One result card in the feed
pub const CARD: &str = "div[role='article']";

/// Business name inside a card
pub const CARD_HEADLINE: &str = "div.fontHeadlineSmall";

/// Any labelled element inside a card (its label is usually the name)
pub const LABELLED: &str = "[aria-label]";

/// Headings of the page or detail panel
pub const PAGE_HEADING: &str = "h1 span, h1, .DUwDvf, .fontHeadlineSmall";

/// Detail panel opened after clicking a card
pub const DETAIL_PANEL: &str = "div[role='main']";

pub const ADDRESS: &str = "button[data-item-id*='address'] div[aria-label], \
                           span[aria-label*='Address'], \
                           button[aria-label*='Dirección']";

pub const PHONE: &str = "[aria-label^='Teléfono:'], [aria-label^='Phone:']";

/// Candidate elements for the cookie-consent button
pub const CONSENT_BUTTON: &str = "button";

/// Generic headings shown above the result list instead of a business name
pub const PLACEHOLDER_HEADINGS: [&str; 2] = ["Resultados", "Results"];

/// Key used to scroll when the feed container is missing
pub const PAGE_DOWN: &str = "PageDown";
