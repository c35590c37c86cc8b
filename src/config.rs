//! Client configuration.
//!
//! Handles loading and saving client settings from JSONC files. Settings
//! cover the HTTP timeout, the browser identity sent upstream, locale
//! parameters and the upstream base URLs.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default browser identity; the watch and results pages serve a stripped
/// layout without `ytInitialData` to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Settings shared by the blocking and async clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Total request timeout in seconds
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
    /// Interface language (`hl` parameter)
    pub language: String,
    /// Content region (`gl` parameter)
    pub region: String,
    /// Result limit used by `search_videos`
    pub max_results: usize,
    /// Base URL for watch, results and channel pages
    pub base_url: String,
    /// Base URL for the suggest endpoint
    pub suggest_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            language: "en".to_string(),
            region: "US".to_string(),
            max_results: 10,
            base_url: "https://www.youtube.com".to_string(),
            suggest_url: "https://suggestqueries-clients6.youtube.com".to_string(),
        }
    }
}

impl ClientConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<ClientConfig>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/yt-api-wrapper/config.jsonc`
    /// 3. `~/.config/yt-api-wrapper/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: ClientConfig = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| format!("Failed to deserialize config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Default configuration file path.
    ///
    /// Returns `$XDG_CONFIG_HOME/yt-api-wrapper/config.jsonc` or
    /// `~/.config/yt-api-wrapper/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join("yt-api-wrapper").join("config.jsonc"))
    }
}

/// Remove `//` line comments that sit outside of string literals.
///
/// Escaped quotes are not tracked.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut search_from = 0;
            while let Some(offset) = line[search_from..].find("//") {
                let comment_pos = search_from + offset;
                let quote_count = line[..comment_pos].matches('"').count();
                if quote_count % 2 == 0 {
                    return line[..comment_pos].trim_end();
                }
                search_from = comment_pos + 2;
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
