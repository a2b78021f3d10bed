//! Crawler module: drives map searches and enumerates their results
//!
//! This module contains the core crawling logic, including:
//! - Revealing more result cards by scrolling the feed
//! - Best-effort cookie-consent dismissal
//! - Waiting for a clicked card's detail view to replace the previous one
//! - The per-location search session (candidate enumerator)
//! - Overall crawl coordination across locations

mod consent;
mod coordinator;
mod detail;
mod pagination;
mod session;

pub use consent::dismiss_consent;
pub use coordinator::{run_crawl, Coordinator};
pub use pagination::reveal_more;
pub use session::SearchSession;

use crate::model::LocationTask;
use url::form_urlencoded;

/// Builds the search URL for a location
///
/// The query ("Bares en Centro") is form-encoded, spaces as `+`, and appended
/// to the base URL verbatim.
pub fn search_url(base_url: &str, task: &LocationTask, connector: &str) -> String {
    let query = task.query(connector);
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", base_url, encoded)
}
