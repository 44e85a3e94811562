use anyhow::{Context, Result};
use colored::Colorize;
use mcp_review::config;

pub async fn handle_init(force: bool) -> Result<()> {
    let config_path = config::get_config_path().await?;

    if config_path.exists() && !force {
        println!(
            "{} {} (use --force to overwrite)",
            "Config file already exists:".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    let config_path = config::create_default_config()
        .await
        .context("Failed to initialize configuration.")?;
    println!("✅ Created default config file: {}", config_path.display());
    Ok(())
}
