//! Candidate enumerator: one search session over one location
//!
//! The session walks its [`SessionPhase`]s in order. Card handles are never
//! kept across a click: the card list is re-resolved from the live page
//! before every use.

use crate::browser::{selectors, BrowserSession};
use crate::config::SearchConfig;
use crate::crawler::consent::dismiss_consent;
use crate::crawler::detail::{still_showing, wait_for_detail};
use crate::crawler::pagination::reveal_more;
use crate::extract::{detail_view_text, extract_candidate};
use crate::ingest::IngestionGateway;
use crate::model::LocationTask;
use crate::output::SessionReport;
use crate::state::{CardOutcome, SessionPhase};
use crate::{Result, ScoutError};
use std::time::Duration;

/// A single search session driving one browser page
pub struct SearchSession<'a, B: BrowserSession> {
    browser: &'a mut B,
    config: &'a SearchConfig,
    gateway: &'a IngestionGateway,
    task: &'a LocationTask,
    /// Bounded wait for the search page itself to settle
    navigation_timeout: Duration,
    phase: SessionPhase,
    report: SessionReport,
}

impl<'a, B: BrowserSession> SearchSession<'a, B> {
    pub fn new(
        browser: &'a mut B,
        config: &'a SearchConfig,
        gateway: &'a IngestionGateway,
        task: &'a LocationTask,
        navigation_timeout: Duration,
    ) -> Self {
        Self {
            browser,
            config,
            gateway,
            task,
            navigation_timeout,
            phase: SessionPhase::Idle,
            report: SessionReport::new(task.to_string()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    fn transition(&mut self, next: SessionPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        if next.is_per_card() {
            tracing::trace!("{}: {} -> {}", self.task, self.phase, next);
        } else {
            tracing::debug!("{}: {} -> {}", self.task, self.phase, next);
        }
        self.phase = next;
        Ok(())
    }

    /// Runs the session against `url` and reports what happened per card
    ///
    /// Errors before enumeration starts (navigation, the search page never
    /// settling) abort the session. Errors on a single card are logged and
    /// counted as [`CardOutcome::Failed`].
    pub async fn run(mut self, url: &str) -> Result<SessionReport> {
        self.transition(SessionPhase::Searching)?;
        self.browser.navigate(url).await?;
        self.browser.wait_for_settle(self.navigation_timeout).await?;
        tokio::time::sleep(self.config.initial_render_wait()).await;

        self.transition(SessionPhase::CookieConsent)?;
        dismiss_consent(&mut *self.browser, self.config).await;
        tokio::time::sleep(self.config.post_consent_wait()).await;

        self.transition(SessionPhase::Scrolling)?;
        let visible = reveal_more(&mut *self.browser, self.config).await;

        // The bound is fixed here; cards revealed later are not visited
        let bound = visible.min(self.config.max_cards);
        self.report.cards = bound;
        tracing::debug!("{}: {} cards visible, visiting {}", self.task, visible, bound);

        for index in 0..bound {
            self.transition(SessionPhase::Enumerating)?;

            let outcome = match self.process_card(index).await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => {
                    tracing::warn!(
                        "Result list shrank below {} cards, ending session",
                        index + 1
                    );
                    break;
                }
                Err(e) => {
                    tracing::warn!("[ERROR] Card {}: {}", index + 1, e);
                    CardOutcome::Failed
                }
            };

            tracing::debug!("Card {} -> {}", index + 1, outcome);
            self.report.record(outcome);
        }

        self.transition(SessionPhase::Done)?;
        Ok(self.report)
    }

    /// Opens, extracts and ingests the card at `index`
    ///
    /// Returns `Ok(None)` when the live list no longer has that many cards.
    async fn process_card(&mut self, index: usize) -> Result<Option<CardOutcome>> {
        let cards = self.browser.query_all(selectors::CARD).await?;
        let Some(card) = cards.into_iter().nth(index) else {
            return Ok(None);
        };

        // What the panel shows before the click, to tell the new card apart
        let before = detail_view_text(&*self.browser).await;

        self.browser.scroll_into_view(&card).await?;
        tokio::time::sleep(self.config.pre_click_pause()).await;
        self.browser.click(&card).await?;

        let settled = wait_for_detail(
            &*self.browser,
            before.as_deref(),
            self.config.card_settle_timeout(),
            self.config.card_settle_poll(),
        )
        .await;

        if !settled {
            tracing::debug!("Detail view for card {} still loading", index + 1);
            tokio::time::sleep(self.config.card_fallback_pause()).await;

            if still_showing(&*self.browser, before.as_deref()).await {
                return Err(ScoutError::StaleDetail(index + 1));
            }
        }

        self.transition(SessionPhase::Extracting)?;
        let fresh = match self.browser.query_all(selectors::CARD).await {
            Ok(cards) => cards.into_iter().nth(index),
            Err(e) => {
                tracing::debug!("Could not re-resolve card {}: {}", index + 1, e);
                None
            }
        };
        let candidate = extract_candidate(&*self.browser, fresh.as_ref()).await;
        let name = candidate.display_name().to_string();

        let Some(record) = candidate.into_record(self.task) else {
            tracing::info!("[SKIP] {} has no valid phone", name);
            return Ok(Some(CardOutcome::NoPhone));
        };

        self.transition(SessionPhase::Validating)?;
        Ok(Some(self.gateway.ingest(&record).await.into()))
    }
}
