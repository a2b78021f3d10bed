//! Crawler coordinator - main crawl orchestration logic
//!
//! Runs one search session per location, strictly in order, on a single
//! browser page. A failed session is logged with its area and skipped; only
//! launching the browser is fatal.

use crate::browser::{BrowserSession, ChromeSession};
use crate::config::Config;
use crate::crawler::search_url;
use crate::crawler::session::SearchSession;
use crate::ingest::IngestionGateway;
use crate::model::LocationTask;
use crate::output::{RunSummary, SessionReport};
use crate::storage::Store;
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main crawler coordinator structure
pub struct Coordinator<B: BrowserSession> {
    browser: B,
    config: Arc<Config>,
    gateway: IngestionGateway,
}

impl<B: BrowserSession> Coordinator<B> {
    /// Creates a coordinator over an already launched browser
    ///
    /// The store is constructed once by the caller and shared with the
    /// ingestion gateway.
    pub fn new(browser: B, config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            browser,
            config: Arc::new(config),
            gateway: IngestionGateway::new(store),
        }
    }

    /// Runs every location task and returns the aggregated counters
    pub async fn run(&mut self) -> RunSummary {
        let tasks = self.config.location_tasks();
        tracing::info!("Starting crawl of {} locations", tasks.len());

        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        for task in &tasks {
            match self.run_location(task).await {
                Ok(report) => {
                    tracing::info!("{}", report);
                    summary.add_session(report);
                }
                Err(e) => {
                    tracing::error!("[ERROR] Area '{}': {}", task.area, e);
                    summary.add_failure(task.to_string());
                }
            }
        }

        tracing::info!(
            "Crawl completed in {:?}: {}",
            start_time.elapsed(),
            summary
        );

        summary
    }

    /// Runs one search session for a location
    pub async fn run_location(&mut self, task: &LocationTask) -> Result<SessionReport> {
        let search = &self.config.search;
        let query = task.query(&search.connector);
        let url = search_url(&search.base_url, task, &search.connector);

        tracing::info!("=== Searching: {} ===", query);
        tracing::debug!("Search URL: {}", url);

        let navigation_timeout = Duration::from_millis(self.config.browser.navigation_timeout);
        SearchSession::new(
            &mut self.browser,
            search,
            &self.gateway,
            task,
            navigation_timeout,
        )
        .run(&url)
        .await
    }

    /// Gives the browser back, e.g. to close it
    pub fn into_browser(self) -> B {
        self.browser
    }
}

/// Launches Chrome and runs a complete crawl
///
/// Failing to launch the browser is returned as an error; everything after a
/// successful launch is best-effort.
pub async fn run_crawl(config: Config, store: Arc<dyn Store>) -> Result<RunSummary> {
    let browser = ChromeSession::launch(&config.browser).await?;

    let mut coordinator = Coordinator::new(browser, config, store);
    let summary = coordinator.run().await;

    if let Err(e) = coordinator.into_browser().close().await {
        tracing::warn!("Failed to close browser cleanly: {}", e);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{FixtureBrowser, FixtureCard, FixturePage};
    use crate::config::{LocationEntry, SearchConfig, StoreBackend, StoreConfig};
    use crate::storage::SqliteStore;

    fn create_test_config(areas: &[&str]) -> Config {
        Config {
            browser: Default::default(),
            search: SearchConfig {
                base_url: "https://maps.test/search/".to_string(),
                initial_render_wait: 0,
                consent_timeout: 0,
                post_consent_wait: 0,
                scroll_pulses: 0,
                scroll_settle: 0,
                pre_click_pause: 0,
                card_settle_timeout: 0,
                card_fallback_pause: 0,
                ..SearchConfig::default()
            },
            store: StoreConfig {
                backend: StoreBackend::Sqlite,
                database_path: Some(":memory:".to_string()),
                supabase_url: None,
                api_key_env: "SUPABASE_KEY".to_string(),
                table: "negocios".to_string(),
            },
            locations: areas
                .iter()
                .map(|area| LocationEntry {
                    area: area.to_string(),
                    population: Some(1000),
                    category: Some("Bar".to_string()),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_unreachable_location_is_skipped() {
        let browser = FixtureBrowser::new().with_page(
            "https://maps.test/search/Bar+en+Sol",
            FixturePage::new(vec![FixtureCard::business("Bar Sol", Some("612345678"), None)]),
        );
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());

        let mut coordinator =
            Coordinator::new(browser, create_test_config(&["Nowhere", "Sol"]), store.clone());
        let summary = coordinator.run().await;

        assert_eq!(summary.locations_failed(), 1);
        assert_eq!(summary.failed_locations, vec!["Nowhere / Bar"]);
        assert_eq!(summary.locations_done(), 1);
        assert_eq!(store.count_entries().unwrap(), 1);

        let browser = coordinator.into_browser();
        assert_eq!(
            browser.activity().navigations,
            vec![
                "https://maps.test/search/Bar+en+Nowhere",
                "https://maps.test/search/Bar+en+Sol"
            ]
        );
    }
}
