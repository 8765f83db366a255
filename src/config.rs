use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    #[serde(default)]
    pub locale: Locale,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_api_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    Config::siteboard_dir()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            locale: Locale::default(),
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        std::env::var("SITEBOARD_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::siteboard_dir().join("config.toml"))
    }

    pub fn siteboard_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".siteboard")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SITEBOARD_API_URL") {
            self.api_url = val;
        }

        if let Ok(val) = std::env::var("SITEBOARD_TIMEOUT_SECONDS") {
            if let Ok(seconds) = val.parse() {
                self.request_timeout_seconds = seconds;
            }
        }

        if let Ok(val) = std::env::var("SITEBOARD_LOCALE") {
            match val.parse() {
                Ok(locale) => self.locale = locale,
                Err(e) => tracing::warn!("Ignoring SITEBOARD_LOCALE: {}", e),
            }
        }

        if let Ok(path) = std::env::var("SITEBOARD_DATA_DIR") {
            self.data_dir = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("SITEBOARD_EXPORT_DIR") {
            self.export_dir = PathBuf::from(path);
        }
    }
}

pub async fn show_config() -> Result<()> {
    let config = Config::load()?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub async fn init_config() -> Result<()> {
    let config_path = Config::config_path();

    if config_path.exists() {
        anyhow::bail!("Config file already exists at: {}", config_path.display());
    }

    let config = Config::default();
    config.save()?;

    println!("Initialized config at: {}", config_path.display());
    Ok(())
}
