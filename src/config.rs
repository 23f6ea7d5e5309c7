use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{cache, upstream};

pub const ENV_ACCESS_KEY: &str = "AVIATIONSTACK_ACCESS_KEY";
pub const ENV_CACHE_TTL: &str = "AVIATIONSTACK_CACHE_TTL";
pub const ENV_DEBUG: &str = "APP_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub aviation: AviationConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Verbose mode. Enables forced refresh via `?debug` and attaches raw
    /// upstream error details to responses.
    pub debug: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8088,
            cors_allowed_origins: vec![
                "http://localhost:8088".to_string(),
                "http://127.0.0.1:8088".to_string(),
            ],
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AviationConfig {
    pub base_url: String,

    /// Credential attached to every upstream call. Never sent to callers.
    pub access_key: String,

    /// Upstream request timeout in seconds (default: 15)
    pub request_timeout_seconds: u64,

    /// Lifetime of cached upstream payloads in minutes (default: 15)
    pub cache_ttl_minutes: u64,
}

impl Default for AviationConfig {
    fn default() -> Self {
        Self {
            base_url: upstream::DEFAULT_BASE_URL.to_string(),
            access_key: String::new(),
            request_timeout_seconds: upstream::DEFAULT_TIMEOUT_SECONDS,
            cache_ttl_minutes: cache::DEFAULT_TTL_MINUTES,
        }
    }
}

impl fmt::Debug for AviationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AviationConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &"[redacted]")
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("cache_ttl_minutes", &self.cache_ttl_minutes)
            .finish()
    }
}

impl AviationConfig {
    #[must_use]
    pub const fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on entries held by the in-process cache
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and process
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides taken from the environment. The lookup is injected so tests
    /// never touch the real process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_ACCESS_KEY).filter(|k| !k.trim().is_empty()) {
            self.aviation.access_key = key.trim().to_string();
        }

        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            self.aviation.cache_ttl_minutes = ttl
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CACHE_TTL} must be a whole number of minutes"))?;
        }

        if let Some(debug) = lookup(ENV_DEBUG) {
            self.general.debug = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flightdesk").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".flightdesk").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.aviation.cache_ttl_minutes == 0 {
            anyhow::bail!("Cache TTL must be at least one minute");
        }

        if self.aviation.cache_ttl_minutes > cache::MAX_TTL_MINUTES {
            anyhow::bail!(
                "Cache TTL must not exceed {} minutes",
                cache::MAX_TTL_MINUTES
            );
        }

        if self.aviation.request_timeout_seconds == 0 {
            anyhow::bail!("Upstream request timeout must be > 0");
        }

        let base = url::Url::parse(&self.aviation.base_url)
            .with_context(|| format!("Invalid upstream base URL: {}", self.aviation.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("Upstream base URL must use http or https");
        }

        if self.cache.max_entries == 0 {
            anyhow::bail!("Cache max_entries must be > 0");
        }

        if self.aviation.access_key.is_empty() {
            warn!("No upstream access key configured; set {ENV_ACCESS_KEY}");
        }

        Ok(())
    }
}
