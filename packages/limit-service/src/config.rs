use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub stream_name: String,
    pub user_directory_url: String,
    pub poll_interval_secs: u64,
    /// Publish the bundled fixture events at startup (demo / offline mode).
    pub seed_events: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            stream_name: env::var("STREAM_NAME")
                .unwrap_or_else(|_| "user-limit-events".to_string()),
            user_directory_url: env::var("USER_DIRECTORY_URL")
                .context("USER_DIRECTORY_URL must be set")?,
            poll_interval_secs: env::var("CONSUMER_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("CONSUMER_POLL_INTERVAL_SECS must be a valid number")?,
            seed_events: env::var("SEED_EVENTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}
