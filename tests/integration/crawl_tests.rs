//! Integration tests for the crawler
//!
//! These tests drive the coordinator against scripted search pages served by
//! `FixtureBrowser` and an in-memory SQLite store, covering the full
//! search → enumerate → extract → ingest cycle.

use barrio_scout::browser::{Fault, FixtureBrowser, FixtureCard, FixturePage};
use barrio_scout::config::{
    load_config, BrowserConfig, Config, LocationEntry, SearchConfig, StoreBackend, StoreConfig,
};
use barrio_scout::crawler::Coordinator;
use barrio_scout::storage::SqliteStore;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const BASE_URL: &str = "https://maps.test/search/";

/// Creates a test configuration with no fixed pauses and the given locations
fn create_test_config(locations: &[(&str, u64, &str)]) -> Config {
    Config {
        browser: BrowserConfig::default(),
        search: SearchConfig {
            base_url: BASE_URL.to_string(),
            initial_render_wait: 0,
            consent_timeout: 0,
            post_consent_wait: 0,
            scroll_pulses: 0,
            scroll_settle: 0,
            pre_click_pause: 0,
            card_settle_timeout: 500,
            card_settle_poll: 2,
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
        locations: locations
            .iter()
            .map(|(area, population, category)| LocationEntry {
                area: area.to_string(),
                population: Some(*population),
                category: Some(category.to_string()),
            })
            .collect(),
    }
}

fn url_for(category: &str, area: &str) -> String {
    format!("{}{}+en+{}", BASE_URL, category, area)
}

/// Ten businesses with distinct valid phones
fn ten_bars() -> Vec<FixtureCard> {
    (0..10)
        .map(|i| {
            let phone = format!("6000000{:02}", i);
            FixtureCard::business(&format!("{}. Bar {}", i + 1, i), Some(phone.as_str()), None)
        })
        .collect()
}

#[tokio::test]
async fn test_end_to_end_centro_scenario() {
    // 8 cards: 5 with valid phones (two of them sharing one), 1 without a
    // phone and 2 that fail when clicked
    let cards = vec![
        FixtureCard::business("1. Bar Pepe", Some("612 34 56 78"), Some("Calle de Toledo, 5")),
        FixtureCard::business("2. Taberna El Sur", Some("699112233"), None),
        FixtureCard::business("3. Bar Sin Teléfono", None, Some("Plaza Mayor, 1")),
        FixtureCard::business("4. Bar Pepe (terraza)", Some("612345678"), None),
        FixtureCard::business("5. Café Luna", Some("711 22 33 44"), None)
            .with_fault(Fault::DetachedOnClick),
        FixtureCard::business("6. Cervecería Norte", Some("655443322"), Some("Calle Norte, 3")),
        FixtureCard::business("7. Bar Roto", Some("677889900"), None)
            .with_fault(Fault::DetachedOnClick),
        FixtureCard::business("8. La Bodeguita", Some("(912) 345-678"), None),
    ];

    let browser = FixtureBrowser::new().with_page(url_for("Bar", "Centro"), FixturePage::new(cards));
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let config = create_test_config(&[("Centro", 5000, "Bar")]);

    let mut coordinator = Coordinator::new(browser, config, store.clone());
    let summary = coordinator.run().await;

    assert_eq!(summary.locations_done(), 1);
    let report = &summary.sessions[0];
    assert_eq!(report.cards, 8);
    assert_eq!(report.saved, 4);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.no_phone, 1);
    assert_eq!(report.failed, 2);

    let entries = store.entries().unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Bar Pepe", "Taberna El Sur", "Cervecería Norte", "La Bodeguita"]
    );

    for entry in &entries {
        assert_eq!(entry.area, "Centro");
        assert_eq!(entry.expected_population, 5000);
        assert_eq!(entry.category, "Bar");
    }
    assert_eq!(entries[0].phone.as_deref(), Some("612345678"));
    assert_eq!(entries[0].address.as_deref(), Some("Calle de Toledo, 5"));
    assert_eq!(entries[3].phone.as_deref(), Some("912345678"));
}

#[tokio::test]
async fn test_fault_at_one_card_does_not_stop_enumeration() {
    let mut cards = ten_bars();
    cards[3] = cards[3].clone().with_fault(Fault::DetachedOnClick);

    let browser = FixtureBrowser::new().with_page(url_for("Bar", "Centro"), FixturePage::new(cards));
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let config = create_test_config(&[("Centro", 5000, "Bar")]);

    let mut coordinator = Coordinator::new(browser, config, store.clone());
    let summary = coordinator.run().await;

    let report = &summary.sessions[0];
    assert_eq!(report.saved, 9);
    assert_eq!(report.failed, 1);
    assert_eq!(report.visited(), 10);

    let browser = coordinator.into_browser();
    assert_eq!(
        browser.activity().clicked_cards,
        vec![0, 1, 2, 4, 5, 6, 7, 8, 9]
    );

    let phones: Vec<String> = store
        .entries()
        .unwrap()
        .into_iter()
        .filter_map(|e| e.phone)
        .collect();
    assert!(!phones.contains(&"600000003".to_string()));
    assert_eq!(phones.len(), 9);
}

#[tokio::test]
async fn test_stuck_location_does_not_block_the_next() {
    let browser = FixtureBrowser::new()
        .with_page(
            url_for("Bar", "Atascado"),
            FixturePage::new(ten_bars()).never_settles(),
        )
        .with_page(
            url_for("Bar", "Centro"),
            FixturePage::new(vec![
                FixtureCard::business("Bar Pepe", Some("612345678"), None),
                FixtureCard::business("Bar Sol", Some("699112233"), None),
            ]),
        );
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let config = create_test_config(&[("Atascado", 100, "Bar"), ("Centro", 5000, "Bar")]);

    let mut coordinator = Coordinator::new(browser, config, store.clone());
    let summary = coordinator.run().await;

    assert_eq!(summary.failed_locations, vec!["Atascado / Bar"]);
    assert_eq!(summary.locations_done(), 1);
    assert_eq!(summary.total_saved(), 2);

    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.area == "Centro"));

    // Nothing was clicked on the stuck page
    let browser = coordinator.into_browser();
    assert_eq!(browser.activity().clicked_cards, vec![0, 1]);
}

#[tokio::test]
async fn test_second_run_only_finds_duplicates() {
    let page = FixturePage::new(vec![
        FixtureCard::business("Bar Pepe", Some("612345678"), None),
        FixtureCard::business("Bar Sol", Some("699112233"), None),
        FixtureCard::business("Bar Mudo", None, None),
    ]);
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());

    for run in 0..2 {
        let browser = FixtureBrowser::new().with_page(url_for("Bar", "Centro"), page.clone());
        let config = create_test_config(&[("Centro", 5000, "Bar")]);
        let mut coordinator = Coordinator::new(browser, config, store.clone());
        let summary = coordinator.run().await;

        let report = &summary.sessions[0];
        if run == 0 {
            assert_eq!(report.saved, 2);
            assert_eq!(report.duplicates, 0);
        } else {
            assert_eq!(report.saved, 0);
            assert_eq!(report.duplicates, 2);
        }
        assert_eq!(report.no_phone, 1);
    }

    assert_eq!(store.count_entries().unwrap(), 2);
}

#[tokio::test]
async fn test_consent_and_page_down_pagination() {
    let cards = (0..6)
        .map(|i| {
            let phone = format!("61111111{}", i);
            FixtureCard::business(&format!("Bar {}", i), Some(phone.as_str()), None)
        })
        .collect();
    let page = FixturePage::new(cards)
        .revealing(2, 2)
        .without_feed()
        .with_consent("Aceptar todo");

    let browser = FixtureBrowser::new().with_page(url_for("Bar", "Centro"), page);
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let mut config = create_test_config(&[("Centro", 5000, "Bar")]);
    config.search.scroll_pulses = 2;

    let mut coordinator = Coordinator::new(browser, config, store.clone());
    let summary = coordinator.run().await;

    assert_eq!(summary.sessions[0].cards, 6);
    assert_eq!(summary.total_saved(), 6);

    let activity = coordinator.into_browser().activity();
    assert_eq!(activity.consent_dismissed, 1);
    assert_eq!(activity.key_presses, vec!["PageDown", "PageDown"]);
    assert_eq!(activity.feed_scrolls, 0);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[search]
base-url = "{BASE_URL}"
initial-render-wait = 0
consent-timeout = 0
post-consent-wait = 0
scroll-pulses = 0
pre-click-pause = 0
card-settle-timeout = 0
card-fallback-pause = 0
max-cards = 2

[store]
backend = "sqlite"
database-path = ":memory:"

[[location]]
area = "  "

[[location]]
area = "Lavapiés"
population = 3200
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let tasks = config.location_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].category, "Bares");

    let browser = FixtureBrowser::new().with_page(
        "https://maps.test/search/Bares+en+Lavapi%C3%A9s",
        FixturePage::new(ten_bars()),
    );
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());

    let mut coordinator = Coordinator::new(browser, config, store.clone());
    let summary = coordinator.run().await;

    assert_eq!(summary.sessions[0].cards, 2);
    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].area, "Lavapiés");
    assert_eq!(entries[0].category, "Bares");
    assert_eq!(entries[0].expected_population, 3200);
}
