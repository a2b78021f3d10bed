use std::fmt;

/// Leading digits of Spanish mobile (6, 7) and premium/landline-range (8, 9) numbers
const VALID_PREFIXES: [char; 4] = ['6', '7', '8', '9'];

/// Length of a national number without country code
pub const NATIONAL_LENGTH: usize = 9;

/// A normalized national phone number: exactly 9 ASCII digits starting with 6-9
///
/// The only way to obtain one is [`PhoneNumber::parse`], so holding a
/// `PhoneNumber` means the value already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips every non-digit character and accepts the result only when it
    /// is exactly 9 digits long with a valid leading digit
    ///
    /// ```
    /// use barrio_scout::PhoneNumber;
    ///
    /// assert_eq!(PhoneNumber::parse("tel: 6-12 34 56 78").unwrap().as_str(), "612345678");
    /// assert!(PhoneNumber::parse("0034 512345678").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.len() != NATIONAL_LENGTH {
            return None;
        }

        match digits.chars().next() {
            Some(first) if VALID_PREFIXES.contains(&first) => Some(Self(digits)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
