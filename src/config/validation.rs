use crate::config::types::{AuthConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_auth_config(&config.auth)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    parse_http_url("base_url", &config.base_url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    // delay_ms >= 0 is always true for u64, so no check needed

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates authentication configuration
///
/// Each variant must carry usable values; an empty token or username is a
/// misconfiguration rather than a request to crawl anonymously.
pub fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    match config {
        AuthConfig::None => Ok(()),
        AuthConfig::Basic { username, .. } => {
            if username.is_empty() {
                return Err(ConfigError::Validation(
                    "basic auth username cannot be empty".to_string(),
                ));
            }
            Ok(())
        }
        AuthConfig::Token { token } => {
            if token.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "bearer token cannot be empty".to_string(),
                ));
            }
            Ok(())
        }
        AuthConfig::SessionLogin { login_url, .. } => {
            parse_http_url("login_url", login_url)?;
            Ok(())
        }
    }
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (field, value) in [("path", &config.path), ("summary_path", &config.summary_path)] {
        if let Some(path) = value {
            if path.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "output {} cannot be empty when set",
                    field
                )));
            }
        }
    }
    Ok(())
}

/// Parses `value` as an absolute HTTP(S) URL with a host
fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(url)
}
