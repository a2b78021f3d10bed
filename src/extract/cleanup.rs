use crate::browser::selectors::PLACEHOLDER_HEADINGS;
use regex::Regex;
use std::sync::LazyLock;

/// Ordinal prefix such as "3. " or "12) "
static LEADING_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s*").unwrap());

/// Bullet or dash glyph prefix
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[·•\-–—]\s*").unwrap());

/// Field label some address elements carry in their accessible name
static ADDRESS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:dirección|address)\s*:\s*").unwrap());

/// Strips a leading ordinal and bullet glyphs from a business name
///
/// If nothing is left afterwards the trimmed input is returned unchanged.
pub fn clean_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_index = LEADING_INDEX.replace(trimmed, "");
    let without_bullet = LEADING_BULLET.replace(&without_index, "");
    let cleaned = without_bullet.trim();

    if cleaned.is_empty() {
        trimmed.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Strips the "Dirección:" label and surrounding whitespace
pub fn clean_address(raw: &str) -> Option<String> {
    let cleaned = ADDRESS_LABEL.replace(raw, "");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Generic list headings that must never be taken as a business name
pub fn is_placeholder_heading(text: &str) -> bool {
    let text = text.trim();
    PLACEHOLDER_HEADINGS
        .iter()
        .any(|placeholder| placeholder.eq_ignore_ascii_case(text))
}

/// Accessible label of the results list container ("Resultados de Bar en Centro")
pub fn is_results_label(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    PLACEHOLDER_HEADINGS
        .iter()
        .any(|placeholder| label.starts_with(&placeholder.to_lowercase()))
}
