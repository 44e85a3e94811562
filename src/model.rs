//! src/model.rs

use crate::errors::ReviewError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Focus areas sent with every typed request unless the caller overrides them.
pub const DEFAULT_FOCUS_AREAS: [&str; 5] = [
    "compilation",
    "security",
    "performance",
    "bugs",
    "code_quality",
];

/// Value of `action` in the webhook envelope.
pub const WEBHOOK_ACTION: &str = "ide_review";

// --- Request shapes ---

/// Body of `POST /review`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub diff: String,
    pub files: Vec<String>,
    pub focus_areas: Vec<String>,
}

impl ReviewRequest {
    pub fn new(diff: impl Into<String>, files: &[String]) -> Self {
        Self {
            diff: diff.into(),
            files: files.to_vec(),
            focus_areas: DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_focus_areas(mut self, focus_areas: Vec<String>) -> Self {
        self.focus_areas = focus_areas;
        self
    }
}

/// Body of `POST /ide/review`.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub action: &'a str,
    pub diff: &'a str,
    pub files: &'a [String],
    pub source: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub fn new(diff: &'a str, files: &'a [String], source: &'a str) -> Self {
        Self {
            action: WEBHOOK_ACTION,
            diff,
            files,
            source,
        }
    }
}

// --- Response shapes ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub review: Option<ReviewResult>,
}

impl ReviewResponse {
    /// Collapses the envelope into the review or the server's own failure message.
    pub fn into_result(self) -> Result<ReviewResult, ReviewError> {
        match (self.status.as_str(), self.review) {
            ("success", Some(review)) => Ok(review),
            _ => Err(ReviewError::Application(
                self.message.unwrap_or_else(|| "Review failed".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub summary: String,
    /// 0 to 10 by convention. Not clamped.
    pub score: i64,
    /// Kept in the order the server sent them.
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub approval_recommended: bool,
    #[serde(default)]
    pub block_merge: bool,
}

impl ReviewResult {
    /// Copy of this result holding only issues at or above `minimum`.
    pub fn filtered(&self, minimum: IssueSeverity) -> ReviewResult {
        ReviewResult {
            issues: self
                .issues
                .iter()
                .filter(|issue| issue.severity_level().at_least(minimum))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub fn count_at(&self, severity: IssueSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity_level() == severity)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIssue {
    #[serde(default)]
    pub severity: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl ReviewIssue {
    pub fn severity_level(&self) -> IssueSeverity {
        IssueSeverity::parse(&self.severity)
    }
}

// --- Severity ---

/// Closed severity scale. Declared lowest first so the derived ordering follows rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Critical = 5,
}

impl IssueSeverity {
    pub const ALL: [IssueSeverity; 5] = [
        IssueSeverity::Critical,
        IssueSeverity::High,
        IssueSeverity::Medium,
        IssueSeverity::Low,
        IssueSeverity::Info,
    ];

    /// Case-insensitive. Anything unrecognised, including the empty string, is `Info`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Info,
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or(Self::Info)
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn at_least(self, minimum: IssueSeverity) -> bool {
        self.rank() >= minimum.rank()
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::High => "🟠",
            Self::Medium => "🟡",
            Self::Low => "🔵",
            Self::Info => "ℹ️",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Critical => "#FF0000",
            Self::High => "#FFA500",
            Self::Medium => "#FFD700",
            Self::Low => "#0000FF",
            Self::Info => "#808080",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

impl From<&str> for IssueSeverity {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}
