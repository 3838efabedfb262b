use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Root URL of the storage server, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Text that must be typed to delete directories that are not empty.
    pub confirmation_phrase: String,
    pub notice_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Ask for the phrase on every bulk delete, even when every target
    /// is a file or an empty directory.
    pub always_confirm_bulk_delete: bool,
    pub log_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            confirmation_phrase: "DELETE".to_string(),
            notice_ttl_secs: 3,
            request_timeout_secs: 30,
            always_confirm_bulk_delete: false,
            log_dir: "logs".to_string(),
        }
    }
}

impl AppConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Repairs values that would make the client unusable.
    fn sanitize(&mut self) {
        if self.confirmation_phrase.trim().is_empty() {
            self.confirmation_phrase = AppConfig::default().confirmation_phrase;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = AppConfig::default().request_timeout_secs;
        }
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("cloudnav");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(Self {
            config_file: config_dir.join("cloudnav.toml"),
        })
    }

    pub fn with_file(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
        }

        let content =
            fs::read_to_string(&self.config_file).context("Failed to read config file")?;

        let mut config = parse_config(&content)?;
        config.sanitize();
        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_file
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    toml::from_str(content).context("Failed to parse config file")
}
