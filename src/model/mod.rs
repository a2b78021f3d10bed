//! Domain model shared by the crawler, the extractor and the stores
//!
//! - `LocationTask`: one (area, population, category) search to run
//! - `Candidate`: best-effort fields read from one opened result card
//! - `BusinessRecord`: a validated, phone-bearing record ready for ingestion
//! - `PhoneNumber`: a normalized 9-digit Spanish mobile number

mod location;
mod phone;
mod record;

pub use location::LocationTask;
pub use phone::PhoneNumber;
pub use record::{BusinessRecord, Candidate, PersistedEntry, UNNAMED_BUSINESS};
