use crate::config::types::{Config, CrawlConfig, DownloadConfig, LedgerConfig, PAGE_PLACEHOLDER};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_download_config(&config.download)?;
    validate_ledger_config(&config.ledger)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.start_page < config.end_page {
        return Err(ConfigError::Validation(format!(
            "start_page ({}) must be >= end_page ({}); pages are crawled downwards",
            config.start_page, config.end_page
        )));
    }

    validate_base_url(&config.base_url)?;

    if Selector::parse(&config.link_selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "link_selector is not a valid CSS selector: '{}'",
            config.link_selector
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the listing URL pattern
fn validate_base_url(pattern: &str) -> Result<(), ConfigError> {
    match pattern.matches(PAGE_PLACEHOLDER).count() {
        1 => {}
        n => {
            return Err(ConfigError::Validation(format!(
                "base_url must contain exactly one '{}' placeholder, found {} in '{}'",
                PAGE_PLACEHOLDER, n, pattern
            )))
        }
    }

    let sample = pattern.replacen(PAGE_PLACEHOLDER, "1", 1);
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", pattern, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            pattern
        )));
    }

    Ok(())
}

/// Validates downloader configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download directory cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("program", &config.program),
        ("format", &config.format),
        ("output_template", &config.output_template),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates ledger file locations
fn validate_ledger_config(config: &LedgerConfig) -> Result<(), ConfigError> {
    if config.pages_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "pages_file cannot be empty".to_string(),
        ));
    }

    if config.items_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "items_file cannot be empty".to_string(),
        ));
    }

    if config.pages_file == config.items_file {
        return Err(ConfigError::Validation(
            "pages_file and items_file must be different files".to_string(),
        ));
    }

    Ok(())
}
