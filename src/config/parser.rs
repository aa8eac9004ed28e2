use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding `crawler.max-pages`
pub const ENV_MAX_PAGES: &str = "CRAWL_MAX_PAGES";
/// Environment variable overriding `crawler.max-depth`
pub const ENV_MAX_DEPTH: &str = "CRAWL_MAX_DEPTH";
/// Environment variable overriding `crawler.timeout-seconds`
pub const ENV_TIMEOUT_SECONDS: &str = "CRAWL_TIMEOUT_SECONDS";
/// Environment variable overriding `crawler.request-delay`
pub const ENV_REQUEST_DELAY: &str = "CRAWL_REQUEST_DELAY_SECONDS";

/// Loads and parses a configuration file from the given path
///
/// Every key is optional; missing sections fall back to the defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawlbot::config::load_config;
///
/// let config = load_config(Path::new("crawlbot.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies `CRAWL_*` environment overrides and re-validates
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Applies crawler overrides from an arbitrary key lookup
///
/// Empty values are ignored. Values that do not parse are rejected rather
/// than silently dropped.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_override(&lookup, ENV_MAX_PAGES)? {
        config.crawler.max_pages = v;
    }
    if let Some(v) = parse_override(&lookup, ENV_MAX_DEPTH)? {
        config.crawler.max_depth = v;
    }
    if let Some(v) = parse_override(&lookup, ENV_TIMEOUT_SECONDS)? {
        config.crawler.timeout_seconds = v;
    }
    if let Some(v) = parse_override(&lookup, ENV_REQUEST_DELAY)? {
        config.crawler.request_delay = v;
    }

    validate(config)
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Validation(format!("Invalid {}='{}': {}", key, raw, e))),
        _ => Ok(None),
    }
}
