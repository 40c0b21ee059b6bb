//! Configuration module for hotentry-rss.

use serde::Deserialize;
use std::path::Path;

use crate::{HotentryError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public site root (e.g. "https://feeds.example.com").
    ///
    /// When unset, the site root is derived from each request's Host header.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

/// Upstream source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Structured JSON endpoint, tried first.
    #[serde(default = "default_primary_url")]
    pub primary_url: String,
    /// RDF/RSS 1.0 feed, tried when the primary endpoint fails.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User-Agent pool; one is picked at random per request.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

fn default_primary_url() -> String {
    "https://b.hatena.ne.jp/api/ipad.hotentry?mode=general".to_string()
}

fn default_fallback_url() -> String {
    "https://b.hatena.ne.jp/hotentry.rss".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        "Mozilla/5.0 (X11; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0".to_string(),
    ]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            fallback_url: default_fallback_url(),
            timeout_secs: default_timeout(),
            user_agents: default_user_agents(),
        }
    }
}

/// Background refresh configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Refresh interval in seconds.
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    300 // 5 minutes
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

/// Feed output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Threshold used when the query parameter is missing or malformed.
    #[serde(default = "default_threshold")]
    pub default_threshold: i64,
    /// Value of the channel `<ttl>` element, in minutes.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u32,
    /// Timezone for the help page's last-update time.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_threshold() -> i64 {
    100
}

fn default_ttl() -> u32 {
    5
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            ttl_minutes: default_ttl(),
            timezone: default_timezone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream source configuration.
    #[serde(default)]
    pub source: SourceConfig,
    /// Background refresh configuration.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Feed output configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HotentryError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HotentryError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listen port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) if port.trim().is_empty() => {}
                Err(_) => eprintln!("Ignoring invalid PORT value: {port}"),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("source.primary_url", &self.source.primary_url),
            ("source.fallback_url", &self.source.fallback_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| HotentryError::Config(format!("{name} is not a valid URL: {e}")))?;
        }

        if let Some(public_url) = &self.server.public_url {
            url::Url::parse(public_url).map_err(|e| {
                HotentryError::Config(format!("server.public_url is not a valid URL: {e}"))
            })?;
        }

        if self.source.user_agents.is_empty() {
            return Err(HotentryError::Config(
                "source.user_agents must contain at least one entry".to_string(),
            ));
        }

        if self.source.timeout_secs == 0 {
            return Err(HotentryError::Config(
                "source.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.refresh.interval_secs == 0 {
            return Err(HotentryError::Config(
                "refresh.interval_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
