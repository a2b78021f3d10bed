//! State types for a search session
//!
//! # Components
//!
//! - `SessionPhase`: where the candidate enumerator is within one search session
//! - `CardOutcome`: what happened to a single result card

mod card_outcome;
mod session_phase;

// Re-export main types
pub use card_outcome::CardOutcome;
pub use session_phase::SessionPhase;
