use super::emit_html;
use anyhow::{Context, Result};
use mcp_review::ResponseRenderer;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

pub fn handle_welcome() {
    println!("{}", ResponseRenderer::new().render_welcome());
}

/// Renders a response body saved earlier, read from `input` or stdin when it is `-`.
pub async fn handle_render(input: &str, output: Option<&Path>) -> Result<()> {
    let raw = if input == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read response from stdin.")?;
        raw
    } else {
        fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read response from {input}"))?
    };

    let html = ResponseRenderer::new().render(&raw);
    emit_html(&html, output).await
}
