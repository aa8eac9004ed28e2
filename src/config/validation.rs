use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use std::ops::RangeInclusive;
use url::Url;

/// Allowed range for the per-run page budget
pub const MAX_PAGES_BOUNDS: RangeInclusive<usize> = 1..=500;

/// Allowed range for the link depth budget
pub const MAX_DEPTH_BOUNDS: RangeInclusive<u32> = 1..=20;

/// Allowed range for the wall-clock budget (seconds)
pub const TIMEOUT_SECONDS_BOUNDS: RangeInclusive<u64> = 5..=300;

/// Allowed range for the request delay (seconds)
pub const REQUEST_DELAY_BOUNDS: RangeInclusive<f64> = 0.0..=10.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !MAX_PAGES_BOUNDS.contains(&config.max_pages) {
        return Err(out_of_bounds("max_pages", config.max_pages, &MAX_PAGES_BOUNDS));
    }

    if !MAX_DEPTH_BOUNDS.contains(&config.max_depth) {
        return Err(out_of_bounds("max_depth", config.max_depth, &MAX_DEPTH_BOUNDS));
    }

    if !TIMEOUT_SECONDS_BOUNDS.contains(&config.timeout_seconds) {
        return Err(out_of_bounds(
            "timeout_seconds",
            config.timeout_seconds,
            &TIMEOUT_SECONDS_BOUNDS,
        ));
    }

    // NaN fails `contains`
    if !REQUEST_DELAY_BOUNDS.contains(&config.request_delay) {
        return Err(out_of_bounds(
            "request_delay",
            config.request_delay,
            &REQUEST_DELAY_BOUNDS,
        ));
    }

    Ok(())
}

fn out_of_bounds<T: std::fmt::Display>(
    name: &str,
    value: T,
    bounds: &RangeInclusive<T>,
) -> ConfigError {
    ConfigError::Validation(format!(
        "{} must be between {} and {}, got {}",
        name,
        bounds.start(),
        bounds.end(),
        value
    ))
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The name doubles as the robots.txt product token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only letters, digits, '-' or '_', got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

pub fn clamp_max_pages(value: usize) -> usize {
    value.clamp(*MAX_PAGES_BOUNDS.start(), *MAX_PAGES_BOUNDS.end())
}

pub fn clamp_max_depth(value: u32) -> u32 {
    value.clamp(*MAX_DEPTH_BOUNDS.start(), *MAX_DEPTH_BOUNDS.end())
}

pub fn clamp_timeout_seconds(value: u64) -> u64 {
    value.clamp(*TIMEOUT_SECONDS_BOUNDS.start(), *TIMEOUT_SECONDS_BOUNDS.end())
}

pub fn clamp_request_delay(value: f64) -> f64 {
    if value.is_nan() {
        return *REQUEST_DELAY_BOUNDS.start();
    }
    value.clamp(*REQUEST_DELAY_BOUNDS.start(), *REQUEST_DELAY_BOUNDS.end())
}
