//! Counters for one search session and for a whole run

use crate::state::CardOutcome;
use std::fmt;

/// What one search session did with its result cards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Location label ("Centro / Bar")
    pub location: String,

    /// Number of cards the session set out to visit
    pub cards: usize,

    pub saved: usize,
    pub duplicates: usize,
    pub no_phone: usize,
    pub failed: usize,
    pub store_errors: usize,
}

impl SessionReport {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Counts one card outcome
    pub fn record(&mut self, outcome: CardOutcome) {
        match outcome {
            CardOutcome::Saved => self.saved += 1,
            CardOutcome::Duplicate => self.duplicates += 1,
            CardOutcome::NoPhone => self.no_phone += 1,
            CardOutcome::Failed => self.failed += 1,
            CardOutcome::StoreError => self.store_errors += 1,
        }
    }

    /// Number of cards that produced any outcome
    pub fn visited(&self) -> usize {
        self.saved + self.duplicates + self.no_phone + self.failed + self.store_errors
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} cards, {} saved, {} duplicate, {} without phone, {} failed",
            self.location,
            self.cards,
            self.saved,
            self.duplicates,
            self.no_phone,
            self.failed + self.store_errors
        )
    }
}

/// Aggregate over every location of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sessions: Vec<SessionReport>,

    /// Locations whose session aborted, by label
    pub failed_locations: Vec<String>,
}

impl RunSummary {
    pub fn add_session(&mut self, report: SessionReport) {
        self.sessions.push(report);
    }

    pub fn add_failure(&mut self, location: impl Into<String>) {
        self.failed_locations.push(location.into());
    }

    pub fn locations_done(&self) -> usize {
        self.sessions.len()
    }

    pub fn locations_failed(&self) -> usize {
        self.failed_locations.len()
    }

    pub fn total_saved(&self) -> usize {
        self.sessions.iter().map(|s| s.saved).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.sessions.iter().map(|s| s.duplicates).sum()
    }

    pub fn total_no_phone(&self) -> usize {
        self.sessions.iter().map(|s| s.no_phone).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.sessions
            .iter()
            .map(|s| s.failed + s.store_errors)
            .sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locations searched ({} aborted): {} saved, {} duplicate, {} without phone, {} failed",
            self.locations_done() + self.locations_failed(),
            self.locations_failed(),
            self.total_saved(),
            self.total_duplicates(),
            self.total_no_phone(),
            self.total_failed()
        )
    }
}
