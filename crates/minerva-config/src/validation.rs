//! Config validation.

use minerva_common::ConfigError;

use crate::schema::MinervaConfig;

/// Validate a config, returning the first problem found.
pub fn validate(config: &MinervaConfig) -> Result<(), ConfigError> {
    let url = config.server.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "server.base_url is empty".into(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "server.base_url must start with http:// or https://, got '{url}'"
        )));
    }
    if url.ends_with('/') {
        return Err(ConfigError::ValidationError(
            "server.base_url must not have a trailing slash".into(),
        ));
    }

    if config.server.connect_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "server.connect_timeout_secs must be greater than 0".into(),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "server.request_timeout_secs must be greater than 0".into(),
        ));
    }

    if config.session.ttl_secs <= 0 {
        return Err(ConfigError::ValidationError(
            "session.ttl_secs must be greater than 0".into(),
        ));
    }
    if config.session.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "session.poll_interval_secs must be greater than 0".into(),
        ));
    }

    Ok(())
}
