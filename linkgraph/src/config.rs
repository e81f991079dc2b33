//! Validator configuration parsed from environment variables.

use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

/// Landing page of the site; home-navigation links point here.
pub const INDEX_PAGE: &str = "index.html";

/// Pages the site guarantees to serve.
pub const CRITICAL_PAGES: [&str; 7] = [
    "index.html",
    "fotografie.html",
    "geocaching.html",
    "geschichte.html",
    "laufen.html",
    "yoga.html",
    "soziale-treffpunkte.html",
];

pub const DEFAULT_SETTLE_MS: u64 = 500;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub critical_pages: Vec<String>,
    /// Upper bound for an anchor activation to settle into view.
    pub settle: Duration,
    /// Pages (and critical retrievals) checked at once.
    pub concurrency: usize,
    pub fetch_timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            critical_pages: CRITICAL_PAGES.iter().map(|p| (*p).to_owned()).collect(),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ValidatorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `LINKGRAPH_SETTLE_MS`: default 500
    /// - `LINKGRAPH_CONCURRENCY`: default 4, at least 1
    /// - `LINKGRAPH_FETCH_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            settle: Duration::from_millis(env_parse("LINKGRAPH_SETTLE_MS", DEFAULT_SETTLE_MS)),
            concurrency: env_parse("LINKGRAPH_CONCURRENCY", DEFAULT_CONCURRENCY).max(1),
            fetch_timeout: Duration::from_secs(env_parse("LINKGRAPH_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)),
            ..Self::default()
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
