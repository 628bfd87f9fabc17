use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/jobs.db";

/// Application configuration loaded from environment variables.
/// Every setting has a default so the tracker runs with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", "5")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
