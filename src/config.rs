use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::inject::{DEFAULT_LINE_BREAK, InjectOptions};
use crate::xml::TextMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub text_mode: TextMode,
    #[serde(default = "default_line_break")]
    pub line_break: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_line_break() -> String {
    DEFAULT_LINE_BREAK.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_mode: TextMode::default(),
            line_break: default_line_break(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("testlink-inject")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".testlink-inject")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from its default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load an explicitly chosen config file, which must exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        debug!(
            "Loaded config with text mode {:?} and line break {:?}",
            config.text_mode, config.line_break
        );
        Ok(config)
    }

    pub fn inject_options(&self) -> InjectOptions {
        InjectOptions {
            text_mode: self.text_mode,
            line_break: self.line_break.clone(),
        }
    }
}
