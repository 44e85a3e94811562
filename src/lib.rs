//! src/lib.rs
//!
//! Client library for an MCP code review server: submit a diff, get findings
//! back, render them as HTML.

pub mod client;
pub mod config;
pub mod errors;
pub mod git;
pub mod model;
pub mod render;

pub use client::ReviewClient;
pub use config::ReviewSettings;
pub use errors::ReviewError;
pub use git::{DiffScope, DiffSource, GitDiffSource};
pub use model::{IssueSeverity, ReviewIssue, ReviewRequest, ReviewResponse, ReviewResult};
pub use render::ResponseRenderer;
