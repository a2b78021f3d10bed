/// Outcome definitions for a single result card
use std::fmt;

/// What happened to one result card during enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardOutcome {
    /// A new entry was written to the store
    Saved,

    /// An entry with the same phone already existed
    Duplicate,

    /// No valid phone could be extracted; nothing was persisted
    NoPhone,

    /// Opening or reading the card raised an error
    Failed,

    /// The record was valid but the store lookup or insert failed
    StoreError,
}

impl CardOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Duplicate => "duplicate",
            Self::NoPhone => "no_phone",
            Self::Failed => "failed",
            Self::StoreError => "store_error",
        }
    }
}

impl fmt::Display for CardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
