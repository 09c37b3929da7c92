use std::path::PathBuf;

use anyhow::{Context, Result};

/// Record Store server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_file: PathBuf::from(env_or("DATA_FILE", "form-submissions.json")),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Dashboard client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// Client-local storage for the shortlist.
    pub shortlist_file: PathBuf,
    pub rust_log: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env_or("DASHBOARD_API_URL", "http://localhost:5000");
        reqwest::Url::parse(&api_url)
            .with_context(|| format!("DASHBOARD_API_URL '{api_url}' is not a valid URL"))?;

        Ok(ClientConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            shortlist_file: PathBuf::from(env_or("SHORTLIST_FILE", "shortlist.json")),
            rust_log: env_or("RUST_LOG", "warn"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
