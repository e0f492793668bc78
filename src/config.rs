use std::env;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://www.amazon.com/s?k=data+engineering+books";
const DEFAULT_TARGET_COUNT: usize = 50;
const DEFAULT_MAX_PAGES: usize = 100;
const DEFAULT_RETRY_DELAY_SECS: u64 = 300;

/// Runtime configuration for one pipeline invocation.
///
/// The request headers are part of the config rather than a process-wide
/// constant so tests can substitute them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base search-results URL; the page index is appended as a `page`
    /// query parameter.
    pub base_url: String,
    /// Browser-impersonating headers sent with every page request.
    pub headers: Vec<(String, String)>,
    /// Number of deduplicated records to collect before stopping.
    pub target_count: usize,
    /// Ceiling on the page index, so a site that keeps serving duplicate
    /// or empty pages cannot keep the loop alive forever.
    pub max_pages: usize,
    /// Postgres connection string for the destination store.
    pub database_url: String,
    /// Delay before the single per-step retry.
    pub retry_delay: Duration,
}

impl Config {
    /// Reads the config from the environment. Only `DATABASE_URL` is
    /// required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL is not set".into()))?;

        Ok(Self {
            base_url: env::var("BOOKS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            headers: default_headers(),
            target_count: parse_env("BOOKS_TARGET_COUNT", DEFAULT_TARGET_COUNT)?,
            max_pages: parse_env("BOOKS_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            database_url,
            retry_delay: Duration::from_secs(parse_env(
                "BOOKS_RETRY_DELAY_SECS",
                DEFAULT_RETRY_DELAY_SECS,
            )?),
        })
    }

}

/// The fixed desktop-browser header set the scraped site expects.
pub fn default_headers() -> Vec<(String, String)> {
    [
        ("Referer", "https://www.amazon.com/"),
        ("Sec-Ch-Ua", "Not_A Brand"),
        ("Sec-Ch-Ua-Mobile", "?0"),
        ("Sec-Ch-Ua-Platform", "macOS"),
        (
            "User-Agent",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
