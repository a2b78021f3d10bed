//! Scripted browser for tests
//!
//! `FixtureBrowser` serves search pages built from [`FixtureCard`]s. Each query
//! renders the current page state to HTML and evaluates the selector with
//! `scraper`, so the extractor runs against real markup and real selectors.
//!
//! The fixture mimics the behaviours the crawler has to survive:
//! - clicking a card opens its detail panel and invalidates every handle
//!   obtained before the click; a lagging panel keeps showing the previous
//!   card for a while
//! - scrolling the feed (or pressing PageDown) reveals more cards
//! - a consent dialog may cover the page until its button is clicked
//! - faults can be injected per card or per page

use crate::browser::{BrowserError, BrowserResult, BrowserSession};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Failure injected into a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Clicking the card fails as if its node had been detached
    DetachedOnClick,
    /// The panel keeps showing the previously opened card for this long
    SlowPanel(Duration),
    /// The panel never switches to this card
    StalePanel,
}

/// When the detail panel catches up with the last clicked card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PanelLag {
    #[default]
    Settled,
    Until(Instant),
    Stuck,
}

/// One result card: its markup in the feed and in the detail panel
#[derive(Debug, Clone, Default)]
pub struct FixtureCard {
    pub list_html: String,
    pub detail_html: String,
    pub fault: Option<Fault>,
}

impl FixtureCard {
    pub fn new(list_html: impl Into<String>, detail_html: impl Into<String>) -> Self {
        Self {
            list_html: list_html.into(),
            detail_html: detail_html.into(),
            fault: None,
        }
    }

    /// A card with the usual markup for a named business
    pub fn business(name: &str, phone: Option<&str>, address: Option<&str>) -> Self {
        let list_html = format!(
            r##"<a class="hfpxzc" aria-label="{name}" href="#"></a>
               <div class="fontHeadlineSmall">{name}</div>
               <span class="rating">4,5</span>"##
        );

        let mut detail_html = format!(r#"<h1 class="DUwDvf">{name}</h1>"#);
        if let Some(address) = address {
            detail_html.push_str(&format!(
                r#"<button data-item-id="address" aria-label="Dirección: {address}">
                     <div aria-label="Dirección: {address}">{address}</div>
                   </button>"#
            ));
        }
        if let Some(phone) = phone {
            detail_html.push_str(&format!(
                r#"<button data-item-id="phone:tel:{phone}" aria-label="Teléfono: {phone}">
                     <div>{phone}</div>
                   </button>"#
            ));
        }
        detail_html.push_str("<div class=\"hours\">Abierto · Cierra a las 0:00</div>");

        Self::new(list_html, detail_html)
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }
}

/// A search result page served for one URL
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub cards: Vec<FixtureCard>,
    /// Cards rendered before any scrolling
    pub initially_visible: usize,
    /// Cards revealed per scroll pulse
    pub reveal_per_pulse: usize,
    pub has_feed: bool,
    /// Label of the consent button, if a consent dialog is shown
    pub consent_label: Option<String>,
    /// Whether the page ever finishes loading
    pub settles: bool,
    pub heading: String,
}

impl FixturePage {
    pub fn new(cards: Vec<FixtureCard>) -> Self {
        let visible = cards.len();
        Self {
            cards,
            initially_visible: visible,
            reveal_per_pulse: 0,
            has_feed: true,
            consent_label: None,
            settles: true,
            heading: "Resultados".to_string(),
        }
    }

    pub fn revealing(mut self, initially_visible: usize, per_pulse: usize) -> Self {
        self.initially_visible = initially_visible;
        self.reveal_per_pulse = per_pulse;
        self
    }

    pub fn with_consent(mut self, label: impl Into<String>) -> Self {
        self.consent_label = Some(label.into());
        self
    }

    pub fn without_feed(mut self) -> Self {
        self.has_feed = false;
        self
    }

    pub fn never_settles(mut self) -> Self {
        self.settles = false;
        self
    }
}

/// Record of what the crawler did to the fixture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureActivity {
    pub navigations: Vec<String>,
    pub clicked_cards: Vec<usize>,
    pub feed_scrolls: usize,
    pub key_presses: Vec<String>,
    pub consent_dismissed: usize,
}

/// Handle to an element in a fixture page
///
/// A handle is a path (selector + match index, optionally inside a scope) plus
/// the DOM generation it was resolved in.
#[derive(Debug, Clone)]
pub struct FixtureElement {
    generation: u64,
    scope: Option<Box<FixtureElement>>,
    selector: String,
    index: usize,
}

#[derive(Debug, Default)]
struct FixtureState {
    current: Option<String>,
    visible: usize,
    /// Last card clicked successfully
    open_card: Option<usize>,
    /// Card the panel showed before that click
    previous_card: Option<usize>,
    panel_lag: PanelLag,
    consent_open: bool,
    generation: u64,
    activity: FixtureActivity,
}

/// Browser session backed by scripted pages
#[derive(Debug, Default)]
pub struct FixtureBrowser {
    pages: HashMap<String, FixturePage>,
    state: Mutex<FixtureState>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `page` when the crawler navigates to `url`
    pub fn with_page(mut self, url: impl Into<String>, page: FixturePage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    /// What the crawler has done so far
    pub fn activity(&self) -> FixtureActivity {
        self.lock()
            .map(|state| state.activity.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> BrowserResult<MutexGuard<'_, FixtureState>> {
        self.state
            .lock()
            .map_err(|_| BrowserError::Protocol("fixture state poisoned".to_string()))
    }

    /// Card whose details the panel currently renders
    fn shown_card(state: &FixtureState) -> Option<usize> {
        match state.panel_lag {
            PanelLag::Settled => state.open_card,
            PanelLag::Until(at) if Instant::now() >= at => state.open_card,
            PanelLag::Until(_) | PanelLag::Stuck => state.previous_card,
        }
    }

    fn current_page<'a>(&'a self, state: &FixtureState) -> BrowserResult<&'a FixturePage> {
        state
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| BrowserError::Protocol("no page loaded".to_string()))
    }

    /// Renders the current page state to an HTML document
    fn render(&self, state: &FixtureState) -> BrowserResult<String> {
        let page = self.current_page(state)?;
        let mut html = String::from("<html><body>");

        if state.consent_open {
            if let Some(label) = &page.consent_label {
                html.push_str(&format!(
                    r#"<div role="dialog"><button data-consent="accept">{label}</button>
                       <button>Rechazar todo</button></div>"#
                ));
            }
        }

        html.push_str(&format!(
            r#"<div role="navigation"><h1>{}</h1></div>"#,
            page.heading
        ));

        html.push_str(&format!(
            r#"<div role="main" aria-label="{} de la búsqueda">"#,
            page.heading
        ));
        html.push_str(if page.has_feed {
            r#"<div role="feed">"#
        } else {
            r#"<div class="results">"#
        });
        for (index, card) in page.cards.iter().take(state.visible).enumerate() {
            html.push_str(&format!(
                r#"<div role="article" data-index="{index}">{}</div>"#,
                card.list_html
            ));
        }
        html.push_str("</div></div>");

        if let Some(card) = Self::shown_card(state).and_then(|i| page.cards.get(i)) {
            html.push_str(&format!(r#"<div role="main">{}</div>"#, card.detail_html));
        }

        html.push_str("</body></html>");
        Ok(html)
    }

    /// Parses the current page and runs `f` against it
    fn with_document<R>(
        &self,
        f: impl FnOnce(&Html, u64) -> BrowserResult<R>,
    ) -> BrowserResult<R> {
        let state = self.lock()?;
        let html = self.render(&state)?;
        let generation = state.generation;
        drop(state);

        let document = Html::parse_document(&html);
        f(&document, generation)
    }

    fn reveal(&self, state: &mut FixtureState) -> BrowserResult<()> {
        let page = self.current_page(state)?;
        state.visible = (state.visible + page.reveal_per_pulse).min(page.cards.len());
        Ok(())
    }
}

fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|_| BrowserError::InvalidSelector(selector.to_string()))
}

/// Resolves a handle against a document, or reports it as detached
fn resolve<'a>(
    document: &'a Html,
    handle: &FixtureElement,
    generation: u64,
) -> BrowserResult<ElementRef<'a>> {
    if handle.generation != generation {
        return Err(BrowserError::Detached(handle.selector.clone()));
    }

    let selector = parse_selector(&handle.selector)?;
    let found = match &handle.scope {
        Some(scope) => resolve(document, scope, generation)?
            .select(&selector)
            .nth(handle.index),
        None => document.select(&selector).nth(handle.index),
    };

    found.ok_or_else(|| BrowserError::Detached(handle.selector.clone()))
}

/// Walks from an element up through its ancestors
fn self_and_ancestors(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    std::iter::once(element).chain(element.ancestors().filter_map(ElementRef::wrap))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// What a click landed on
enum ClickTarget {
    Card(usize),
    Consent,
    Other,
}

#[async_trait]
impl BrowserSession for FixtureBrowser {
    type Element = FixtureElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let mut state = self.lock()?;
        state.activity.navigations.push(url.to_string());

        let page = self.pages.get(url).ok_or_else(|| BrowserError::Navigation {
            url: url.to_string(),
            message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        })?;

        state.current = Some(url.to_string());
        state.visible = page.initially_visible.min(page.cards.len());
        state.open_card = None;
        state.previous_card = None;
        state.panel_lag = PanelLag::Settled;
        state.consent_open = page.consent_label.is_some();
        state.generation += 1;
        Ok(())
    }

    async fn wait_for_settle(&mut self, timeout: Duration) -> BrowserResult<()> {
        let state = self.lock()?;
        let page = self.current_page(&state)?;

        if !page.settles {
            return Err(BrowserError::Timeout {
                what: "page to settle".to_string(),
                after: timeout,
            });
        }

        Ok(())
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<FixtureElement>> {
        let parsed = parse_selector(selector)?;
        self.with_document(|document, generation| {
            let count = document.select(&parsed).count();
            Ok((0..count)
                .map(|index| FixtureElement {
                    generation,
                    scope: None,
                    selector: selector.to_string(),
                    index,
                })
                .collect())
        })
    }

    async fn query_in(
        &self,
        scope: &FixtureElement,
        selector: &str,
    ) -> BrowserResult<Option<FixtureElement>> {
        let parsed = parse_selector(selector)?;
        self.with_document(|document, generation| {
            let parent = resolve(document, scope, generation)?;
            if parent.select(&parsed).next().is_none() {
                return Ok(None);
            }
            Ok(Some(FixtureElement {
                generation,
                scope: Some(Box::new(scope.clone())),
                selector: selector.to_string(),
                index: 0,
            }))
        })
    }

    async fn is_visible(&self, element: &FixtureElement) -> BrowserResult<bool> {
        self.with_document(|document, generation| {
            let found = resolve(document, element, generation)?;
            Ok(self_and_ancestors(found).all(|e| e.value().attr("hidden").is_none()))
        })
    }

    async fn text(&self, element: &FixtureElement) -> BrowserResult<Option<String>> {
        self.with_document(|document, generation| {
            let found = resolve(document, element, generation)?;
            Ok(Some(element_text(found)))
        })
    }

    async fn attribute(
        &self,
        element: &FixtureElement,
        name: &str,
    ) -> BrowserResult<Option<String>> {
        self.with_document(|document, generation| {
            let found = resolve(document, element, generation)?;
            Ok(found.value().attr(name).map(str::to_string))
        })
    }

    async fn page_text(&self) -> BrowserResult<String> {
        let body = parse_selector("body")?;
        self.with_document(|document, _| {
            Ok(document
                .select(&body)
                .next()
                .map(element_text)
                .unwrap_or_default())
        })
    }

    async fn scroll_by(&mut self, element: &FixtureElement, _dy: i64) -> BrowserResult<()> {
        let is_feed = self.with_document(|document, generation| {
            let found = resolve(document, element, generation)?;
            Ok(found.value().attr("role") == Some("feed"))
        })?;

        let mut state = self.lock()?;
        if is_feed {
            state.activity.feed_scrolls += 1;
            self.reveal(&mut state)?;
        }
        Ok(())
    }

    async fn scroll_into_view(&mut self, element: &FixtureElement) -> BrowserResult<()> {
        self.with_document(|document, generation| {
            resolve(document, element, generation).map(|_| ())
        })
    }

    async fn click(&mut self, element: &FixtureElement) -> BrowserResult<()> {
        let target = self.with_document(|document, generation| {
            let found = resolve(document, element, generation)?;
            if found.value().attr("data-consent").is_some() {
                return Ok(ClickTarget::Consent);
            }
            let card = self_and_ancestors(found)
                .find_map(|e| e.value().attr("data-index"))
                .and_then(|v| v.parse::<usize>().ok());
            Ok(card.map(ClickTarget::Card).unwrap_or(ClickTarget::Other))
        })?;

        let mut state = self.lock()?;
        match target {
            ClickTarget::Card(index) => {
                let fault = self
                    .current_page(&state)?
                    .cards
                    .get(index)
                    .and_then(|card| card.fault);

                let lag = match fault {
                    Some(Fault::DetachedOnClick) => {
                        // The list re-rendered under the pointer
                        state.generation += 1;
                        return Err(BrowserError::Detached(format!("card {}", index)));
                    }
                    Some(Fault::SlowPanel(delay)) => PanelLag::Until(Instant::now() + delay),
                    Some(Fault::StalePanel) => PanelLag::Stuck,
                    None => PanelLag::Settled,
                };

                state.activity.clicked_cards.push(index);
                state.previous_card = Self::shown_card(&state);
                state.open_card = Some(index);
                state.panel_lag = lag;
                state.generation += 1;
            }
            ClickTarget::Consent => {
                state.activity.consent_dismissed += 1;
                state.consent_open = false;
                state.generation += 1;
            }
            ClickTarget::Other => {}
        }
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> BrowserResult<()> {
        let mut state = self.lock()?;
        state.activity.key_presses.push(key.to_string());
        if key == "PageDown" {
            self.reveal(&mut state)?;
        }
        Ok(())
    }
}
