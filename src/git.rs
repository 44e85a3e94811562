//! src/git.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

lazy_static! {
    static ref DIFF_HEADER: Regex = Regex::new(r"(?m)^diff --git a/.+? b/(.+)$").unwrap();
}

// --- Data Structures ---

/// Which changes a diff should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffScope {
    /// Changes added to the index.
    Staged,
    /// Working tree changes not yet staged.
    Unstaged,
    /// Staged and unstaged changes against `HEAD`.
    Uncommitted,
    /// Changes to one path against `HEAD`.
    File(String),
}

impl DiffScope {
    fn diff_args(&self) -> Vec<&str> {
        match self {
            DiffScope::Staged => vec!["diff", "--cached", "--no-color"],
            DiffScope::Unstaged => vec!["diff", "--no-color"],
            DiffScope::Uncommitted => vec!["diff", "HEAD", "--no-color"],
            DiffScope::File(path) => vec!["diff", "HEAD", "--no-color", "--", path.as_str()],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DiffScope::Staged => "staged changes".to_string(),
            DiffScope::Unstaged => "unstaged changes".to_string(),
            DiffScope::Uncommitted => "uncommitted changes".to_string(),
            DiffScope::File(path) => format!("changes in {path}"),
        }
    }
}

/// Supplies the diff and affected paths for a review.
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn diff(&self, scope: &DiffScope) -> Result<String>;
    async fn files(&self, scope: &DiffScope) -> Result<Vec<String>>;
}

/// [`DiffSource`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitDiffSource {
    repo_dir: Option<PathBuf>,
}

impl GitDiffSource {
    /// Runs git in the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: Some(repo_dir.into()),
        }
    }

    pub async fn run_git_command(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new("git");
        command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(dir) = &self.repo_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .context("Failed to execute git command")?;

        if output.status.success() {
            Ok(String::from_utf8(output.stdout).context("Failed to parse git command output")?)
        } else {
            let stderr = String::from_utf8(output.stderr)
                .unwrap_or_else(|_| "Could not read stderr".to_string());
            Err(anyhow!(
                "Git command failed with status {}:\n{}",
                output.status,
                stderr
            ))
        }
    }
}

#[async_trait]
impl DiffSource for GitDiffSource {
    async fn diff(&self, scope: &DiffScope) -> Result<String> {
        self.run_git_command(&scope.diff_args()).await
    }

    async fn files(&self, scope: &DiffScope) -> Result<Vec<String>> {
        if let DiffScope::File(path) = scope {
            return Ok(vec![path.clone()]);
        }

        let mut args = scope.diff_args();
        args.push("--name-only");
        let output = self.run_git_command(&args).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

// --- Helper Functions ---

/// Builds a pseudo-diff that presents `lines` as added at `start_line`.
///
/// Every entry counts as a line, blank ones included.
pub fn selection_diff(file_name: &str, start_line: usize, lines: &[&str]) -> String {
    let count = lines.len();

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{file_name}\n"));
    diff.push_str(&format!("+++ b/{file_name}\n"));
    diff.push_str(&format!("@@ -{start_line},{count} +{start_line},{count} @@\n"));
    for line in lines {
        diff.push('+');
        diff.push_str(line);
        diff.push('\n');
    }
    diff
}

/// Paths named by the `diff --git` headers of a unified diff, in order, without repeats.
pub fn files_from_diff(diff: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for captures in DIFF_HEADER.captures_iter(diff) {
        let path = captures[1].trim().to_string();
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}
