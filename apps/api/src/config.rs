use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional: without a key every generation call falls back to rule-based content.
    pub openai_api_key: Option<String>,
    /// Allowed CORS origin for the web client. Permissive when unset.
    pub frontend_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on AI enrichment per matched pair.
    pub enrichment_timeout: Duration,
    pub default_match_limit: usize,
    pub max_match_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            frontend_url: optional_env("FRONTEND_URL"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enrichment_timeout: Duration::from_secs(parse_env("ENRICHMENT_TIMEOUT_SECS", 5)?),
            default_match_limit: parse_env("DEFAULT_MATCH_LIMIT", 3)?,
            max_match_limit: parse_env("MAX_MATCH_LIMIT", 20)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config for tests that never touch the environment or a real database.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/conekt_test".to_string(),
            openai_api_key: None,
            frontend_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            enrichment_timeout: Duration::from_secs(5),
            default_match_limit: 3,
            max_match_limit: 20,
        }
    }
}
