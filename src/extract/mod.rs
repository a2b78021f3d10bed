//! Field extraction from an opened result card
//!
//! - `phone`: phone validation strategies (labelled field, then free text)
//! - `cleanup`: name and address normalization
//! - `fields`: the per-field fallback chains run against a browser session

mod cleanup;
mod fields;
mod phone;

pub use cleanup::{clean_address, clean_name, is_placeholder_heading, is_results_label};
pub use fields::{detail_panel, detail_view_text, extract_candidate};
pub use phone::{find_phone_in_text, phone_from_label};
