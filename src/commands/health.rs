use anyhow::{bail, Result};
use colored::Colorize;
use mcp_review::{ReviewClient, ReviewSettings};

pub async fn handle_health(settings: &ReviewSettings) -> Result<()> {
    let client = ReviewClient::new(settings)?;

    if client.check_health().await {
        println!("{} {}", "✅ Review server is healthy:".green(), client.server_url());
        Ok(())
    } else {
        println!("{} {}", "❌ Review server is unreachable:".red(), client.server_url());
        bail!("Health check against {} failed.", client.server_url())
    }
}
