use super::review::report_failure;
use super::{emit_html, spinner};
use anyhow::{bail, Context, Result};
use mcp_review::git::selection_diff;
use mcp_review::{ResponseRenderer, ReviewClient, ReviewSettings};
use std::path::Path;
use tokio::fs;

/// Reviews lines `start..=end` of `file` as if they had just been added.
pub async fn handle_selection(
    settings: &ReviewSettings,
    file: &Path,
    start: usize,
    end: usize,
    output: Option<&Path>,
) -> Result<()> {
    if start == 0 || end < start {
        bail!("Invalid selection {start}..{end}: lines start at 1 and end must not precede start.");
    }

    let content = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let selected: Vec<&str> = content.lines().skip(start - 1).take(end - start + 1).collect();
    if selected.iter().all(|line| line.trim().is_empty()) {
        bail!("No code selected in {} lines {start}..{end}.", file.display());
    }

    let file_name = file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("selection");
    let diff = selection_diff(file_name, start, &selected);
    let files = vec![file.display().to_string()];

    let client = ReviewClient::new(settings)?;
    let renderer = ResponseRenderer::new();

    let progress_bar = spinner("Reviewing selected code...");
    let outcome = client.submit_webhook(&diff, &files).await;
    progress_bar.finish_and_clear();

    let raw = report_failure(&renderer, outcome, output).await?;
    emit_html(&renderer.render(&raw), output).await
}
