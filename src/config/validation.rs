use crate::config::types::{Config, CrawlerConfig, FetchConfig, StatusConfig, StorageConfig};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_storage_config(&config.storage)?;
    validate_status_config(&config.status)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            config.parallelism
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.acceptable_content_types.is_empty() {
        return Err(ConfigError::Validation(
            "acceptable-content-types cannot be empty; nothing would ever be downloaded"
                .to_string(),
        ));
    }

    if config.acceptable_content_types.iter().any(|t| t.is_empty()) {
        return Err(ConfigError::Validation(
            "acceptable-content-types entries cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.downloads_dir.is_empty() {
        return Err(ConfigError::Validation(
            "downloads-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_status_config(config: &StatusConfig) -> Result<(), ConfigError> {
    config
        .bind_addr
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Validation(format!("bind-addr '{}' is invalid: {}", config.bind_addr, e))
        })?;

    Ok(())
}
