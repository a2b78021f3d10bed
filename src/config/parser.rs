use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates the TOML configuration at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Loads a configuration together with the SHA-256 hash of the exact text it
/// was parsed from
///
/// The hash is logged at startup so two runs can be told apart by their settings.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;

    if config.locations.is_empty() {
        tracing::warn!("Configuration has no [[location]] entries; nothing will be searched");
    }

    Ok(config)
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PaginationMode, StoreBackend};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[browser]
headless = true
navigation-timeout = 30000

[search]
scroll-pulses = 4
pagination = "until-stable"
max-cards = 15

[store]
backend = "sqlite"
database-path = "./negocios.db"

[[location]]
area = "Centro"
population = 5000
category = "Bar"

[[location]]
area = "Lavapiés"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout, 30000);
        assert_eq!(config.search.scroll_pulses, 4);
        assert_eq!(config.search.pagination, PaginationMode::UntilStable);
        assert_eq!(config.search.max_cards, 15);
        // Unset keys keep their defaults
        assert_eq!(config.search.scroll_step, 400);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.locations.len(), 2);

        let tasks = config.location_tasks();
        assert_eq!(tasks[1].category, "Bares");
    }

    #[test]
    fn test_load_supabase_config() {
        let config_content = r#"
[store]
backend = "supabase"
supabase-url = "https://demo.supabase.co"
api-key-env = "MY_KEY"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Supabase);
        assert_eq!(config.store.api_key_env, "MY_KEY");
        assert_eq!(config.store.table, "negocios");
        assert!(config.locations.is_empty());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/scout.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[search]
max-cards = 0

[store]
backend = "sqlite"
database-path = "./negocios.db"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    const MINIMAL: &str = "[store]\nbackend = \"sqlite\"\ndatabase-path = \"x.db\"\n";

    #[test]
    fn test_config_hash_is_stable() {
        let file = create_temp_config(MINIMAL);

        let (config, hash1) = load_config_with_hash(file.path()).unwrap();
        let (_, hash2) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.store.database_path.as_deref(), Some("x.db"));
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_eq!(hash1, hash_content(MINIMAL));
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config(MINIMAL);
        let file2 = create_temp_config(&format!("{MINIMAL}\n# edited\n"));

        let (_, hash1) = load_config_with_hash(file1.path()).unwrap();
        let (_, hash2) = load_config_with_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
