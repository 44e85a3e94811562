//! src/config.rs

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::model::IssueSeverity;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MINIMUM_SEVERITY: &str = "medium";
pub const DEFAULT_CLIENT_ID: &str = "mcp-review";

pub const ENV_SERVER_URL: &str = "MCP_REVIEW_SERVER_URL";
pub const ENV_TIMEOUT: &str = "MCP_REVIEW_TIMEOUT";
pub const ENV_MIN_SEVERITY: &str = "MCP_REVIEW_MIN_SEVERITY";

const CONFIG_FILE: &str = "config.toml";

/// Settings consumed by the review client and the command line front end.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReviewSettings {
    /// Base URL of the review server.
    pub server_url: String,
    /// Applied separately to the connect and read phases of every request.
    pub timeout_secs: u64,
    /// Lowest severity shown by the CLI. The library itself never filters.
    pub minimum_severity: String,
    pub show_inline_highlights: bool,
    pub auto_review_on_commit: bool,
    /// Sent as `source` and `X-IDE-Client` on the webhook path.
    pub client_id: String,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            minimum_severity: DEFAULT_MINIMUM_SEVERITY.to_string(),
            show_inline_highlights: true,
            auto_review_on_commit: false,
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }
}

impl ReviewSettings {
    pub fn minimum_severity(&self) -> IssueSeverity {
        IssueSeverity::parse(&self.minimum_severity)
    }

    /// Applies `MCP_REVIEW_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an explicit lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT, raw),
            }
        }

        if let Some(severity) = lookup(ENV_MIN_SEVERITY).filter(|v| !v.trim().is_empty()) {
            self.minimum_severity = severity.trim().to_lowercase();
        }
    }
}

/// Returns the configuration directory path (~/.config/mcp-review).
pub async fn get_config_dir() -> Result<PathBuf> {
    let config_dir = if cfg!(windows) {
        // Windows: %APPDATA%\mcp-review
        dirs::data_dir()
            .map(|p| p.join("mcp-review"))
            .context("Could not get data directory")?
    } else {
        // Linux/macOS: ~/.config/mcp-review
        dirs::config_dir()
            .map(|p| p.join("mcp-review"))
            .context("Could not get config directory")?
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .await
            .context("Could not create config directory")?;
    }
    Ok(config_dir)
}

pub async fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir().await?.join(CONFIG_FILE))
}

/// Writes the default settings to `path`, replacing whatever is there.
pub async fn write_default_config(path: &Path) -> Result<()> {
    let config_content = toml::to_string(&ReviewSettings::default())?;
    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("Could not create {}", path.display()))?;
    file.write_all(config_content.as_bytes()).await?;
    Ok(())
}

/// Creates the default configuration file and returns its location.
pub async fn create_default_config() -> Result<PathBuf> {
    let config_path = get_config_path().await?;
    write_default_config(&config_path).await?;
    Ok(config_path)
}

/// Reads settings from `path`. Keys missing from the file keep their defaults.
pub async fn load_config_from(path: &Path) -> Result<ReviewSettings> {
    let config_content = fs::read_to_string(path)
        .await
        .context("Could not read config file")?;
    let settings: ReviewSettings =
        toml::from_str(&config_content).context("Could not parse config file")?;
    Ok(settings)
}

/// Loads the user's settings, creating the file on first use, then applies env overrides.
pub async fn load_settings() -> Result<ReviewSettings> {
    let config_path = get_config_path().await?;

    if !config_path.exists() {
        write_default_config(&config_path).await?;
    }

    let mut settings = load_config_from(&config_path).await?;
    settings.apply_env_overrides();
    Ok(settings)
}
