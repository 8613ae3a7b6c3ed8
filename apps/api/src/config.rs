use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `OPENAI_API_KEY` may be absent at boot: the requester fails fast at
/// request time instead, so a misconfigured deployment still serves /health.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// When set, the relational user store is used instead of the in-memory one.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            database_url: std::env::var("DATABASE_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
