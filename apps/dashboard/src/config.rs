use crate::error::ConfigError;
use dotenv::dotenv;
use reqwest::Url;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_HOST: &str = "https://api.trade.gov/v1/steel_data/search";

/// Where the statistics API lives and how to authenticate against it.
///
/// Read once at startup and handed to the fetchers; nothing re-reads the
/// environment afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    /// Loads `.env` (if present) and reads `STEEL_API_HOST` / `STEEL_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("STEEL_API_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        Url::parse(&host).map_err(|e| ConfigError::InvalidHost {
            host: host.clone(),
            reason: e.to_string(),
        })?;

        let api_key = lookup("STEEL_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self { host, api_key })
    }
}

/// Log file used while the terminal UI owns the screen.
pub fn get_log_path() -> PathBuf {
    env::var("STEEL_DASHBOARD_LOG")
        .map_or_else(|_| PathBuf::from("./steel-dashboard.log"), PathBuf::from)
}
