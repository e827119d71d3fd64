use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Bearer token for the movie catalog API
    pub tmdb_api_key: String,

    /// Movie catalog API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Redis connection URL for the trending store.
    /// When unset, trending counts live in process memory for the session.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Quiet period before a typed query is searched, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Number of trending searches loaded at startup
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_trending_limit() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: TMDB_API_KEY is set but empty");
        }
        if self.trending_limit == 0 {
            anyhow::bail!("Failed to load config: TRENDING_LIMIT must be at least 1");
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
