//! Configuration management for fleet-tracker
//!
//! Config stored at: ~/.config/fleet-tracker/config.toml
//! `FLEET_API_URL` and `FLEET_API_KEY` override the API section.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fleet_infra::tiles::{DEFAULT_SUBDOMAINS, DEFAULT_TILE_URL};
use fleet_infra::{GatewayOptions, TileSource};
use fleet_types::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "FLEET_API_URL";

/// Environment variable overriding `api.token`
pub const ENV_API_KEY: &str = "FLEET_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// Remote vehicle API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as the `Authorization` header, unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Tracking page and map settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Whether the tile map is shown; otherwise the map area renders a table
    #[serde(default = "default_true")]
    pub map_enabled: bool,

    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_tile_subdomains")]
    pub tile_subdomains: String,
}

fn default_base_url() -> String {
    "https://develop-back-rota.rota361.com.br/recruitment".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}

fn default_tile_subdomains() -> String {
    DEFAULT_SUBDOMAINS.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            map_enabled: true,
            tile_url: default_tile_url(),
            tile_subdomains: default_tile_subdomains(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleet-tracker");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// Write a default config file to the default location if none exists
    pub fn init_default() -> Result<bool> {
        Self::init_default_at(&Self::config_path()?)
    }

    /// Write `Config::default()` to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn init_default_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        Ok(true)
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `FLEET_API_URL` / `FLEET_API_KEY` from `lookup`; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty(ENV_API_KEY) {
            self.api.token = Some(token);
        }
    }

    /// Connection settings for the HTTP gateway
    pub fn gateway_options(&self) -> GatewayOptions {
        let options = GatewayOptions::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs.max(1)));
        match self.api.token.as_deref() {
            Some(token) if !token.is_empty() => options.with_token(token),
            _ => options,
        }
    }

    /// Base map tile source
    pub fn tile_source(&self) -> TileSource {
        TileSource::new(
            self.tracking.tile_url.clone(),
            self.tracking.tile_subdomains.clone(),
        )
    }

    /// Interval between fleet refreshes
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.tracking.poll_interval_secs.max(1))
    }

    /// First five characters of the token, for logs
    pub fn token_preview(&self) -> String {
        match self.api.token.as_deref() {
            Some(token) if !token.is_empty() => {
                let prefix: String = token.chars().take(5).collect();
                format!("{}...", prefix)
            }
            _ => "Não definido".to_string(),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fleet Tracker Configuration")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "API URL:        {}", self.api.base_url)?;
        writeln!(f, "API token:      {}", self.token_preview())?;
        writeln!(f, "Timeout:        {}s", self.api.timeout_secs)?;
        writeln!(f, "Poll interval:  {}s", self.tracking.poll_interval_secs)?;
        writeln!(f, "Map enabled:    {}", self.tracking.map_enabled)?;
        writeln!(f, "Tile URL:       {}", self.tracking.tile_url)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
