use super::{types::Config, ConfigError};
use crate::cache::MAX_TTL;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider timeouts are positive
/// - Ranking languages are set
/// - Cache TTL, shard count and capacity are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs must be greater than 0".to_string(),
        ));
    }
    if config.catalog.primary_language.trim().is_empty()
        || config.catalog.secondary_language.trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "catalog.primary_language and catalog.secondary_language cannot be empty".to_string(),
        ));
    }

    if config.encyclopedia.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "encyclopedia.timeout_secs must be greater than 0".to_string(),
        ));
    }
    if config.encyclopedia.language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "encyclopedia.language cannot be empty".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs must be greater than 0".to_string(),
        ));
    }
    if config.cache.ttl_secs > MAX_TTL.as_secs() {
        return Err(ConfigError::ValidationError(format!(
            "cache.ttl_secs cannot exceed {} ({})",
            MAX_TTL.as_secs(),
            config.cache.ttl_secs
        )));
    }
    if config.cache.shards == 0 {
        return Err(ConfigError::ValidationError(
            "cache.shards must be greater than 0".to_string(),
        ));
    }
    if config.cache.max_entries < config.cache.shards {
        return Err(ConfigError::ValidationError(format!(
            "cache.max_entries ({}) must be at least cache.shards ({})",
            config.cache.max_entries, config.cache.shards
        )));
    }

    Ok(())
}
