use crate::model::PhoneNumber;
use regex::Regex;
use std::sync::LazyLock;

/// Nine contiguous digits starting with a valid prefix
static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[6789]\d{8}\b").unwrap());

/// Nine digits starting with a valid prefix, with spaces, hyphens or
/// parentheses allowed between them ("612 34 56 78", "(612) 345-678")
static SPACED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[6789](?:[\s\-()]*\d){8}").unwrap());

/// Validates the value of an explicitly labelled phone field
///
/// Labels look like `"Teléfono: 612 34 56 78"`; everything except the digits
/// is discarded before validation.
pub fn phone_from_label(raw: &str) -> Option<PhoneNumber> {
    PhoneNumber::parse(raw)
}

/// Searches free text for the first valid phone number
///
/// Contiguous runs are preferred over runs with separators. A run that is part
/// of a longer digit sequence (an international prefix glued to the number, a
/// reference code) is ignored.
///
/// A rejected match only skips its first digit, so a valid run overlapping
/// it ("28005 612 34 56 78") is still found.
pub fn find_phone_in_text(text: &str) -> Option<PhoneNumber> {
    [&*PLAIN_NUMBER, &*SPACED_NUMBER]
        .into_iter()
        .find_map(|pattern| first_isolated_match(pattern, text))
}

fn first_isolated_match(pattern: &Regex, text: &str) -> Option<PhoneNumber> {
    let mut start = 0;

    while let Some(m) = pattern.find_at(text, start) {
        if is_isolated(text, m.start(), m.end()) {
            if let Some(phone) = PhoneNumber::parse(m.as_str()) {
                return Some(phone);
            }
        }
        // Matches always begin with an ASCII digit
        start = m.start() + 1;
    }

    None
}

/// True when the match is not glued to other digits on either side
fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}
