use anyhow::{Context, Result};

use crate::catalog::session::PageSizes;
use crate::feeds::{DEFAULT_CORE_FEED_URL, DEFAULT_DAILY_FEED_URL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub daily_feed_url: String,
    pub core_feed_url: String,
    pub insert_relay_url: Option<String>,
    pub page_size_desktop: usize,
    pub page_size_mobile: usize,
    /// Catalog sessions unused for this long are dropped.
    pub session_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            daily_feed_url: env_or("DAILY_FEED_URL", DEFAULT_DAILY_FEED_URL),
            core_feed_url: env_or("CORE_FEED_URL", DEFAULT_CORE_FEED_URL),
            insert_relay_url: std::env::var("INSERT_RELAY_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            page_size_desktop: parse_page_size("PAGE_SIZE_DESKTOP", 32)?,
            page_size_mobile: parse_page_size("PAGE_SIZE_MOBILE", 10)?,
            session_idle_secs: env_or("SESSION_IDLE_SECS", "1800")
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn page_sizes(&self) -> PageSizes {
        PageSizes {
            desktop: self.page_size_desktop,
            mobile: self.page_size_mobile,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/prompt_catalog_test".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            daily_feed_url: DEFAULT_DAILY_FEED_URL.to_string(),
            core_feed_url: DEFAULT_CORE_FEED_URL.to_string(),
            insert_relay_url: None,
            page_size_desktop: 32,
            page_size_mobile: 10,
            session_idle_secs: 1800,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_page_size(key: &str, default: usize) -> Result<usize> {
    let size = env_or(key, &default.to_string())
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    anyhow::ensure!(size > 0, "{key} must be a positive integer");
    Ok(size)
}
