use crate::model::LocationTask;
use serde::Deserialize;
use std::time::Duration;

/// Category used when a location entry does not name one
pub const DEFAULT_CATEGORY: &str = "Bares";

/// Main configuration structure for Barrio-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub store: StoreConfig,
    #[serde(default, rename = "location")]
    pub locations: Vec<LocationEntry>,
}

impl Config {
    /// Converts the `[[location]]` entries into location tasks, in file order
    ///
    /// Entries with a blank area are skipped. A blank or missing category falls
    /// back to [`DEFAULT_CATEGORY`] and a missing population to 0.
    pub fn location_tasks(&self) -> Vec<LocationTask> {
        let mut tasks = Vec::with_capacity(self.locations.len());

        for (position, entry) in self.locations.iter().enumerate() {
            let area = entry.area.trim();
            if area.is_empty() {
                tracing::warn!("Skipping location entry #{} with empty area", position + 1);
                continue;
            }

            let category = entry
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);

            tasks.push(LocationTask::new(
                area,
                entry.population.unwrap_or(0),
                category,
            ));
        }

        tasks
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BrowserConfig {
    /// Run Chrome without a visible window
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub chrome_executable: Option<String>,

    /// Default timeout for navigation and protocol requests (milliseconds)
    pub navigation_timeout: u64,

    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_executable: None,
            navigation_timeout: 60_000,
            window_width: 1280,
            window_height: 900,
        }
    }
}

/// How the result feed is paginated before enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationMode {
    /// Exactly `scroll-pulses` pulses
    Fixed,
    /// Stop early once the card count stops growing
    UntilStable,
}

/// Search session behaviour: timings, bounds and consent handling
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SearchConfig {
    /// Search endpoint; the encoded query is appended verbatim
    pub base_url: String,

    /// Word joining category and area in the query ("Bares en Centro")
    pub connector: String,

    /// Wait after the search page settles (milliseconds)
    pub initial_render_wait: u64,

    /// Total time spent polling for a consent button (milliseconds)
    pub consent_timeout: u64,

    pub consent_poll_interval: u64,

    /// Button labels accepted as cookie-consent, in order of preference
    pub consent_labels: Vec<String>,

    pub post_consent_wait: u64,

    /// Number of scroll pulses against the feed
    pub scroll_pulses: u32,

    /// Delay after each scroll pulse (milliseconds)
    pub scroll_settle: u64,

    /// Pixels scrolled per pulse
    pub scroll_step: i64,

    pub pagination: PaginationMode,

    /// Consecutive non-growing pulses that end `until-stable` pagination
    pub stable_pulses: u32,

    /// Hard cap on cards visited per session
    pub max_cards: usize,

    pub pre_click_pause: u64,

    /// Bounded wait for a detail view to settle after a click (milliseconds)
    pub card_settle_timeout: u64,

    /// Interval between detail panel checks while waiting for it to settle
    pub card_settle_poll: u64,

    /// Pause taken when the detail view does not settle in time
    pub card_fallback_pause: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps/search/".to_string(),
            connector: "en".to_string(),
            initial_render_wait: 5_000,
            consent_timeout: 5_000,
            consent_poll_interval: 500,
            consent_labels: vec![
                "Aceptar todo".to_string(),
                "Aceptar".to_string(),
                "Agree".to_string(),
            ],
            post_consent_wait: 3_000,
            scroll_pulses: 6,
            scroll_settle: 1_200,
            scroll_step: 400,
            pagination: PaginationMode::Fixed,
            stable_pulses: 2,
            max_cards: 20,
            pre_click_pause: 400,
            card_settle_timeout: 10_000,
            card_settle_poll: 250,
            card_fallback_pause: 5_000,
        }
    }
}

impl SearchConfig {
    pub fn initial_render_wait(&self) -> Duration {
        Duration::from_millis(self.initial_render_wait)
    }

    pub fn consent_timeout(&self) -> Duration {
        Duration::from_millis(self.consent_timeout)
    }

    pub fn consent_poll_interval(&self) -> Duration {
        Duration::from_millis(self.consent_poll_interval)
    }

    pub fn post_consent_wait(&self) -> Duration {
        Duration::from_millis(self.post_consent_wait)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle)
    }

    pub fn pre_click_pause(&self) -> Duration {
        Duration::from_millis(self.pre_click_pause)
    }

    pub fn card_settle_timeout(&self) -> Duration {
        Duration::from_millis(self.card_settle_timeout)
    }

    pub fn card_settle_poll(&self) -> Duration {
        Duration::from_millis(self.card_settle_poll)
    }

    pub fn card_fallback_pause(&self) -> Duration {
        Duration::from_millis(self.card_fallback_pause)
    }
}

/// Which persistent store backs the ingestion gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    Sqlite,
    Supabase,
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Path to the SQLite database file (sqlite backend)
    #[serde(default)]
    pub database_path: Option<String>,

    /// Project URL (supabase backend); `SUPABASE_URL` overrides it
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Remote table name (supabase backend)
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_api_key_env() -> String {
    "SUPABASE_KEY".to_string()
}

fn default_table() -> String {
    "negocios".to_string()
}

/// One `[[location]]` entry as written in the file
#[derive(Debug, Clone, Deserialize)]
pub struct LocationEntry {
    #[serde(default)]
    pub area: String,

    /// Expected population of the area
    #[serde(default)]
    pub population: Option<u64>,

    #[serde(default)]
    pub category: Option<String>,
}
