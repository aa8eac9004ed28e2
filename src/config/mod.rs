//! Configuration module
//!
//! Process-wide crawl defaults and their hard bounds, loaded from an optional
//! TOML file and `CRAWL_*` environment variables.
//!
//! # Example
//!
//! ```no_run
//! use crawlbot::config::{apply_env_overrides, load_config};
//! use std::path::Path;
//!
//! let mut config = load_config(Path::new("crawlbot.toml")).unwrap();
//! apply_env_overrides(&mut config).unwrap();
//! println!("Crawler will stop after {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, UserAgentConfig};

pub use parser::{
    apply_env_overrides, apply_overrides_from, compute_config_hash, load_config,
    load_config_with_hash, ENV_MAX_DEPTH, ENV_MAX_PAGES, ENV_REQUEST_DELAY, ENV_TIMEOUT_SECONDS,
};

pub use validation::{
    clamp_max_depth, clamp_max_pages, clamp_request_delay, clamp_timeout_seconds, validate,
    MAX_DEPTH_BOUNDS, MAX_PAGES_BOUNDS, REQUEST_DELAY_BOUNDS, TIMEOUT_SECONDS_BOUNDS,
};
