//! Configuration Module
//!
//! Client configuration: where the recipe API lives and how long fetched
//! data stays cached. Nothing is read from the environment.

use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL_SECS;
use crate::models::DEFAULT_LIMIT;

/// Default origin of the recipe API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Client configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin the fixed `/api/...` paths are resolved against
    pub base_url: String,
    /// Lifetime in seconds of every cached entry
    pub cache_ttl: u64,
    /// Page size used when a caller asks for a page without naming one
    pub default_limit: u32,
}

impl Config {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl = seconds;
        self
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Cache lifetime as a `Duration`.
    pub fn cache_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            default_limit: DEFAULT_LIMIT,
        }
    }
}
