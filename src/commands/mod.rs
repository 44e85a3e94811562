pub mod health;
pub mod init;
pub mod render;
pub mod review;
pub mod selection;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mcp_review::{config, ReviewSettings};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Loads settings from disk and the environment, then applies command line overrides.
pub async fn resolve_settings(server_url: Option<String>, timeout: Option<u64>) -> Result<ReviewSettings> {
    let mut settings = config::load_settings()
        .await
        .context("Failed to load mcp-review settings.")?;

    if let Some(url) = server_url {
        settings.server_url = url;
    }
    if let Some(secs) = timeout.filter(|secs| *secs > 0) {
        settings.timeout_secs = secs;
    }

    log::debug!("Using review server {}", settings.server_url);
    Ok(settings)
}

/// Writes `html` to `output`, or to stdout when no path is given.
pub async fn emit_html(html: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, html)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("{} {}", "📄 Report written to".green(), path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

pub fn spinner(message: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress_bar.set_style(style);
    }
    progress_bar.set_message(message.to_string());
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}
