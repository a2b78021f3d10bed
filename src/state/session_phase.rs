/// Phase definitions for the candidate enumerator state machine
///
/// A session walks `Searching → CookieConsent → Scrolling`, then loops
/// `Enumerating → Extracting → Validating` once per card until `Done`.
use std::fmt;

/// Represents the current phase of one search session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Session created, nothing loaded yet
    Idle,

    /// Navigating to the search URL and waiting for the first render
    Searching,

    /// Polling for the cookie-consent button
    CookieConsent,

    /// Revealing more result cards in the feed
    Scrolling,

    /// Re-resolving the card list and opening the card at the current index
    Enumerating,

    /// Reading fields from the opened detail view
    Extracting,

    /// Checking the phone and handing the record to the ingestion gateway
    Validating,

    /// Every card up to the snapshot bound has been visited
    Done,
}

impl SessionPhase {
    /// Returns true while the session is working through result cards
    pub fn is_per_card(&self) -> bool {
        matches!(self, Self::Enumerating | Self::Extracting | Self::Validating)
    }

    /// Returns true if moving from this phase to `next` is allowed
    ///
    /// Per-card phases may jump back to `Enumerating` for the next index
    /// (a skipped or failed card) or straight to `Done` when the bound is hit.
    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;

        matches!(
            (self, next),
            (Idle, Searching)
                | (Searching, CookieConsent)
                | (CookieConsent, Scrolling)
                | (Scrolling, Enumerating)
                | (Scrolling, Done)
                | (Enumerating, Enumerating)
                | (Enumerating, Extracting)
                | (Enumerating, Done)
                | (Extracting, Validating)
                | (Extracting, Enumerating)
                | (Extracting, Done)
                | (Validating, Enumerating)
                | (Validating, Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::CookieConsent => "cookie_consent",
            Self::Scrolling => "scrolling",
            Self::Enumerating => "enumerating",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionPhase; 8] = [
        SessionPhase::Idle,
        SessionPhase::Searching,
        SessionPhase::CookieConsent,
        SessionPhase::Scrolling,
        SessionPhase::Enumerating,
        SessionPhase::Extracting,
        SessionPhase::Validating,
        SessionPhase::Done,
    ];

    #[test]
    fn test_happy_path_is_allowed() {
        let path = [
            SessionPhase::Idle,
            SessionPhase::Searching,
            SessionPhase::CookieConsent,
            SessionPhase::Scrolling,
            SessionPhase::Enumerating,
            SessionPhase::Extracting,
            SessionPhase::Validating,
            SessionPhase::Enumerating,
            SessionPhase::Extracting,
            SessionPhase::Validating,
            SessionPhase::Done,
        ];

        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_skips_and_failures_return_to_enumerating() {
        // Card without phone
        assert!(SessionPhase::Extracting.can_transition_to(SessionPhase::Enumerating));
        // Card that failed before it could be opened
        assert!(SessionPhase::Enumerating.can_transition_to(SessionPhase::Enumerating));
        // Empty result list
        assert!(SessionPhase::Scrolling.can_transition_to(SessionPhase::Done));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!SessionPhase::Idle.can_transition_to(SessionPhase::Scrolling));
        assert!(!SessionPhase::Searching.can_transition_to(SessionPhase::Enumerating));
        assert!(!SessionPhase::Validating.can_transition_to(SessionPhase::Extracting));
        assert!(!SessionPhase::Scrolling.can_transition_to(SessionPhase::Searching));

        // Done is terminal
        for next in ALL {
            assert!(!SessionPhase::Done.can_transition_to(next));
        }
    }

    #[test]
    fn test_is_per_card() {
        assert!(SessionPhase::Enumerating.is_per_card());
        assert!(SessionPhase::Extracting.is_per_card());
        assert!(SessionPhase::Validating.is_per_card());

        assert!(!SessionPhase::Scrolling.is_per_card());
        assert!(!SessionPhase::Done.is_per_card());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SessionPhase::CookieConsent), "cookie_consent");
        assert_eq!(format!("{}", SessionPhase::Done), "done");

        let names: std::collections::HashSet<&str> = ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names.len(), ALL.len());
    }
}
