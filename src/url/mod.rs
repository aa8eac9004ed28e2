//! URL handling module
//!
//! This module provides URL normalization and the origin helpers used for
//! deduplication, robots.txt caching, and origin-allow policy.

mod normalize;
mod origin;

pub use normalize::normalize_url;
pub use origin::{canonical_origin, is_origin_allowed, origin_of, same_origin};
