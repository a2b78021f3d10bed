use crate::config::types::{BrowserConfig, Config, SearchConfig, StoreBackend, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_browser_config(&config.browser)?;
    validate_search_config(&config.search)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout < 1000 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout must be >= 1000ms, got {}ms",
            config.navigation_timeout
        )));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if let Some(path) = &config.chrome_executable {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome_executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates search session configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;

    if config.max_cards < 1 {
        return Err(ConfigError::Validation(format!(
            "max_cards must be >= 1, got {}",
            config.max_cards
        )));
    }

    if config.scroll_pulses > 100 {
        return Err(ConfigError::Validation(format!(
            "scroll_pulses must be <= 100, got {}",
            config.scroll_pulses
        )));
    }

    if config.stable_pulses < 1 {
        return Err(ConfigError::Validation(format!(
            "stable_pulses must be >= 1, got {}",
            config.stable_pulses
        )));
    }

    if config.consent_timeout > 0 && config.consent_poll_interval == 0 {
        return Err(ConfigError::Validation(
            "consent_poll_interval must be > 0 when consent_timeout is set".to_string(),
        ));
    }

    if config.card_settle_timeout > 0 && config.card_settle_poll == 0 {
        return Err(ConfigError::Validation(
            "card_settle_poll must be > 0 when card_settle_timeout is set".to_string(),
        ));
    }

    if config.consent_labels.iter().any(|l| l.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "consent_labels cannot contain empty labels".to_string(),
        ));
    }

    if config.connector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "connector cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration for the selected backend
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    match config.backend {
        StoreBackend::Sqlite => {
            let path = config.database_path.as_deref().unwrap_or("");
            if path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "database_path is required for the sqlite backend".to_string(),
                ));
            }
        }
        StoreBackend::Supabase => {
            // The URL may also come from SUPABASE_URL at startup
            if let Some(url) = &config.supabase_url {
                validate_http_url("supabase_url", url)?;
            }

            if config.api_key_env.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "api_key_env cannot be empty".to_string(),
                ));
            }

            if config.table.trim().is_empty()
                || !config
                    .table
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "table must be a plain identifier, got '{}'",
                    config.table
                )));
            }
        }
    }

    Ok(())
}

/// Validates that a URL parses and uses an HTTP(S) scheme
pub(crate) fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
