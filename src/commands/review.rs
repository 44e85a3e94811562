//! src/commands/review.rs

use super::{emit_html, spinner};
use crate::cli::ReviewArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use mcp_review::git::files_from_diff;
use mcp_review::render::{Recommendation, ScoreBand};
use mcp_review::{
    DiffScope, DiffSource, GitDiffSource, IssueSeverity, ResponseRenderer, ReviewClient,
    ReviewError, ReviewResult, ReviewSettings,
};
use std::path::Path;

/// Handles the code review of the working tree.
pub async fn handle_review(settings: &ReviewSettings, args: ReviewArgs) -> Result<()> {
    let scope = match (&args.file, args.staged) {
        (Some(path), _) => DiffScope::File(path.clone()),
        (None, true) => DiffScope::Staged,
        (None, false) => DiffScope::Uncommitted,
    };

    let source = GitDiffSource::new();
    let diff = source
        .diff(&scope)
        .await
        .with_context(|| format!("Failed to get git diff for {}.", scope.describe()))?;

    if diff.trim().is_empty() {
        println!("{}", format!("No {} to review.", scope.describe()).yellow());
        return Ok(());
    }

    let mut files = source
        .files(&scope)
        .await
        .context("Failed to list changed files.")?;
    if files.is_empty() {
        files = files_from_diff(&diff);
    }

    let client = ReviewClient::new(settings)?;
    let renderer = ResponseRenderer::new();
    let output = args.output.as_deref();

    let progress_bar = spinner(&format!("Reviewing {} changed file(s)...", files.len()));

    if args.webhook {
        let outcome = client.submit_webhook(&diff, &files).await;
        progress_bar.finish_and_clear();
        let raw = report_failure(&renderer, outcome, output).await?;
        return emit_html(&renderer.render(&raw), output).await;
    }

    let focus_areas = (!args.focus.is_empty()).then(|| args.focus.clone());
    let outcome = client.submit(&diff, &files, focus_areas).await;
    progress_bar.finish_and_clear();
    let result = report_failure(&renderer, outcome, output).await?;

    let minimum = (!args.all_issues).then(|| settings.minimum_severity());
    let html = match minimum {
        Some(minimum) => renderer.render_filtered(&result, minimum),
        None => renderer.render_result(&result),
    };

    if output.is_some() {
        print_summary(&result, minimum);
    }
    emit_html(&html, output).await
}

/// On failure, writes an error document to the report file so the viewer shows
/// something, then hands the error back to the caller.
pub(crate) async fn report_failure<T>(
    renderer: &ResponseRenderer,
    outcome: Result<T, ReviewError>,
    output: Option<&Path>,
) -> Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(e) => {
            if output.is_some() {
                emit_html(&renderer.render_error(&e), output).await?;
            }
            Err(anyhow::Error::new(e).context("Code review request failed."))
        }
    }
}

fn print_summary(result: &ReviewResult, minimum: Option<IssueSeverity>) {
    let score = format!("Score: {}/10", result.score);
    let score = match ScoreBand::of(result.score) {
        ScoreBand::Good => score.green(),
        ScoreBand::Warning => score.yellow(),
        ScoreBand::Bad => score.red(),
    };
    println!("{}", score.bold());

    for severity in IssueSeverity::ALL {
        let count = result.count_at(severity);
        if count == 0 {
            continue;
        }
        let hidden = minimum.is_some_and(|minimum| !severity.at_least(minimum));
        if hidden {
            println!("  {} {}: {} (hidden)", severity.glyph(), severity, count);
        } else {
            println!("  {} {}: {}", severity.glyph(), severity, count);
        }
    }

    if let Some(minimum) = minimum {
        let hidden = result
            .issues
            .iter()
            .filter(|issue| !issue.severity_level().at_least(minimum))
            .count();
        if hidden > 0 {
            println!(
                "{}",
                format!("{hidden} issue(s) below {minimum} hidden, use --all-issues to show them.")
                    .yellow()
            );
        }
    }

    let recommendation = Recommendation::of(result);
    let label = match recommendation {
        Recommendation::DoNotMerge => recommendation.label().red(),
        Recommendation::Approved => recommendation.label().green(),
        Recommendation::ReviewRecommended => recommendation.label().yellow(),
    };
    println!("{}", label.bold());
}
