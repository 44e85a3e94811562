//! src/render.rs
//!
//! Turns review outcomes into self-contained HTML documents styled for a dark,
//! read-only viewer. Rendering never fails: input that cannot be read as a
//! review is shown verbatim instead.

use crate::errors::ReviewError;
use crate::model::{IssueSeverity, ReviewIssue, ReviewResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const TITLE: &str = "🤖 MCP AI Code Review";
const NO_SUMMARY: &str = "No summary available";

const STYLESHEET: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    font-size: 13px;
    padding: 16px;
    background-color: #2b2b2b;
    color: #a9b7c6;
}
h1 { color: #6897bb; font-size: 18px; margin-bottom: 8px; }
h2 { color: #6897bb; font-size: 16px; margin-top: 16px; margin-bottom: 8px; }
h3 { color: #6897bb; font-size: 14px; margin-top: 12px; margin-bottom: 6px; }
.score { font-size: 24px; font-weight: bold; }
.score-good { color: #6a8759; }
.score-warning { color: #bbb529; }
.score-bad { color: #cc7832; }
.critical { background-color: #3c2828; border-left: 4px solid #cc0000; padding: 8px; margin: 8px 0; }
.high { background-color: #3c3528; border-left: 4px solid #cc7832; padding: 8px; margin: 8px 0; }
.medium { background-color: #3c3c28; border-left: 4px solid #bbb529; padding: 8px; margin: 8px 0; }
.low { background-color: #283c3c; border-left: 4px solid #6897bb; padding: 8px; margin: 8px 0; }
.info { background-color: #2b2b2b; border-left: 4px solid #808080; padding: 8px; margin: 8px 0; }
.file-path { color: #9876aa; font-family: monospace; font-size: 12px; }
.category { color: #808080; font-size: 11px; }
.suggestion { background-color: #2d3c28; padding: 8px; margin: 8px 0; border-radius: 4px; }
pre {
    background-color: #3c3f41;
    padding: 12px;
    border-radius: 4px;
    overflow-x: auto;
    font-family: 'JetBrains Mono', Consolas, monospace;
    font-size: 12px;
}
hr { border: none; border-top: 1px solid #3c3f41; margin: 16px 0; }
"#;

/// Visual band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Warning,
    Bad,
}

impl ScoreBand {
    pub fn of(score: i64) -> Self {
        if score >= 8 {
            ScoreBand::Good
        } else if score >= 6 {
            ScoreBand::Warning
        } else {
            ScoreBand::Bad
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Good => "score-good",
            ScoreBand::Warning => "score-warning",
            ScoreBand::Bad => "score-bad",
        }
    }
}

/// Final verdict line. Blocking wins over approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    DoNotMerge,
    Approved,
    ReviewRecommended,
}

impl Recommendation {
    pub fn from_flags(block_merge: bool, approval_recommended: bool) -> Self {
        if block_merge {
            Recommendation::DoNotMerge
        } else if approval_recommended {
            Recommendation::Approved
        } else {
            Recommendation::ReviewRecommended
        }
    }

    pub fn of(result: &ReviewResult) -> Self {
        Self::from_flags(result.block_merge, result.approval_recommended)
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::DoNotMerge => "Do not merge",
            Recommendation::Approved => "Approved",
            Recommendation::ReviewRecommended => "Review recommended",
        }
    }

    fn html(self) -> String {
        match self {
            Recommendation::DoNotMerge => format!(
                "<p>❌ <strong>{}</strong> - Critical issues must be fixed first.</p>",
                self.label()
            ),
            Recommendation::Approved => {
                format!("<p>✅ <strong>{}</strong> - Code looks good!</p>", self.label())
            }
            Recommendation::ReviewRecommended => format!(
                "<p>⚠️ <strong>{}</strong> - Please address the issues above.</p>",
                self.label()
            ),
        }
    }
}

// --- Loose response shape ---

/// Reads a field as `T`, or as absent when it has the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
struct LooseReview {
    #[serde(default)]
    score: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    issues: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    approval_recommended: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    block_merge: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(default)]
    review: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct LooseIssue {
    #[serde(default, deserialize_with = "lenient")]
    severity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    file_path: Option<String>,
    #[serde(default)]
    line_number: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    suggestion: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    code_snippet: Option<String>,
}

/// Whole-number view of a JSON number. Fractions truncate toward zero.
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
}

impl LooseIssue {
    fn into_issue(self) -> ReviewIssue {
        ReviewIssue {
            severity: self.severity.unwrap_or_default(),
            title: self.title.unwrap_or_else(|| "Issue".to_string()),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            file_path: self.file_path,
            line_number: self
                .line_number
                .as_ref()
                .and_then(as_integer)
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok()),
            suggestion: self.suggestion,
            code_snippet: self.code_snippet,
        }
    }
}

impl LooseReview {
    fn has_own_fields(&self) -> bool {
        self.score.is_some() || self.summary.is_some() || self.issues.is_some()
    }

    fn into_result(self) -> Option<ReviewResult> {
        if !self.has_own_fields() {
            // Server envelopes carry the review one level down.
            if let Some(inner) = self.review.filter(Value::is_object) {
                return serde_json::from_value::<LooseReview>(inner)
                    .ok()
                    .and_then(LooseReview::into_result);
            }
            // A failed envelope is not a review; show it as it came.
            if self.status.as_deref().is_some_and(|s| s != "success") {
                return None;
            }
        }

        let issues = self
            .issues
            .unwrap_or_default()
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value::<LooseIssue>(v).ok())
            .map(LooseIssue::into_issue)
            .collect();

        Some(ReviewResult {
            summary: self.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
            score: self.score.as_ref().and_then(as_integer).unwrap_or(0),
            issues,
            approval_recommended: self.approval_recommended.unwrap_or(true),
            block_merge: self.block_merge.unwrap_or(false),
        })
    }
}

/// Reads `raw` as a review, substituting defaults for missing fields.
///
/// Returns `None` when `raw` is not a JSON object.
pub fn parse_loose(raw: &str) -> Option<ReviewResult> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<LooseReview>(value)
        .ok()
        .and_then(LooseReview::into_result)
}

// --- Rendering ---

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes `text` and turns its newlines into line breaks.
fn multiline(text: &str) -> String {
    escape_html(text).replace("\r\n", "\n").replace('\n', "<br/>")
}

/// Stateless HTML renderer for review outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    fn document(body: &str) -> String {
        format!(
            "<html>\n<head>\n<meta charset='utf-8'/>\n<title>MCP AI Code Review</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n<h1>{TITLE}</h1>\n{body}</body>\n</html>\n"
        )
    }

    pub fn render_welcome(&self) -> String {
        Self::document(
            "<p>Welcome! Use the following commands to review your code:</p>\n\
             <ul>\n\
             <li><strong>mcp-review review --file &lt;path&gt;</strong> - Review current file</li>\n\
             <li><strong>mcp-review selection &lt;path&gt; --start &lt;line&gt; --end &lt;line&gt;</strong> - Review selection</li>\n\
             <li><strong>mcp-review review --staged</strong> - Review staged changes</li>\n\
             <li><strong>mcp-review review</strong> - Review uncommitted changes</li>\n\
             <li><strong>mcp-review health</strong> - Check the review server</li>\n\
             </ul>\n\
             <hr/>\n\
             <p><em>Configure the server URL with <strong>mcp-review init</strong> or MCP_REVIEW_SERVER_URL.</em></p>\n",
        )
    }

    /// Renders a raw response body. Bodies that are not a JSON object fall back to a verbatim view.
    pub fn render(&self, raw: &str) -> String {
        match parse_loose(raw) {
            Some(result) => self.render_result(&result),
            None => self.render_raw(raw),
        }
    }

    pub fn render_raw(&self, raw: &str) -> String {
        Self::document(&format!(
            "<h2>Response</h2>\n<pre>{}</pre>\n",
            escape_html(raw)
        ))
    }

    pub fn render_result(&self, result: &ReviewResult) -> String {
        Self::document(&result_body(result, None))
    }

    /// Renders only the issues at or above `minimum` and says how many were left out.
    pub fn render_filtered(&self, result: &ReviewResult, minimum: IssueSeverity) -> String {
        let shown = result.filtered(minimum);
        let hidden = result.issues.len() - shown.issues.len();
        Self::document(&result_body(&shown, Some((hidden, minimum))))
    }

    /// Document describing a failed call, including the raw body when one was kept.
    pub fn render_error(&self, error: &ReviewError) -> String {
        let mut body = format!(
            "<h2>❌ Review failed ({})</h2>\n<p>{}</p>\n",
            error.kind(),
            multiline(&error.to_string())
        );
        if let Some(raw) = error.raw_body().filter(|b| !b.is_empty()) {
            body.push_str("<h3>Response</h3>\n");
            body.push_str(&format!("<pre>{}</pre>\n", escape_html(raw)));
        }
        Self::document(&body)
    }
}

/// `hidden` carries the number of issues dropped below a minimum severity, if any were filtered.
fn result_body(result: &ReviewResult, hidden: Option<(usize, IssueSeverity)>) -> String {
    let mut body = String::new();

    let band = ScoreBand::of(result.score);
    body.push_str(&format!(
        "<p class='score {}'>Score: {}/10</p>\n",
        band.css_class(),
        result.score
    ));

    body.push_str("<h2>📝 Summary</h2>\n");
    body.push_str(&format!("<p>{}</p>\n", multiline(&result.summary)));

    let hidden = hidden.filter(|(count, _)| *count > 0);
    match (result.issues.is_empty(), hidden) {
        (true, None) => {
            body.push_str("<h2>✅ No Issues Found</h2>\n");
            body.push_str("<p>Great job! Your code looks good.</p>\n");
        }
        (true, Some((_, minimum))) => {
            body.push_str(&format!("<h2>✅ No Issues at or above {minimum}</h2>\n"));
        }
        (false, _) => {
            body.push_str(&format!(
                "<h2>⚠️ Issues Found ({})</h2>\n",
                result.issues.len()
            ));
            for issue in &result.issues {
                body.push_str(&render_issue(issue));
            }
        }
    }

    if let Some((count, minimum)) = hidden {
        body.push_str(&format!(
            "<p class='hidden-issues'>{count} issue(s) below {minimum} hidden.</p>\n"
        ));
    }

    body.push_str("<hr/>\n");
    body.push_str(&Recommendation::of(result).html());
    body.push('\n');
    body
}

fn render_issue(issue: &ReviewIssue) -> String {
    let severity: IssueSeverity = issue.severity_level();
    let mut block = format!("<div class='issue {}'>\n", severity.css_class());
    block.push_str(&format!(
        "<h3>{} {}</h3>\n",
        severity.glyph(),
        escape_html(&issue.title)
    ));

    if !issue.category.is_empty() {
        block.push_str(&format!(
            "<p class='category'>{}</p>\n",
            escape_html(&issue.category)
        ));
    }

    if let Some(path) = &issue.file_path {
        block.push_str(&format!("<p class='file-path'>📁 {}", escape_html(path)));
        if let Some(line) = issue.line_number {
            block.push_str(&format!(" (Line {line})"));
        }
        block.push_str("</p>\n");
    }

    block.push_str(&format!("<p>{}</p>\n", multiline(&issue.description)));

    if let Some(snippet) = &issue.code_snippet {
        block.push_str(&format!("<pre>{}</pre>\n", escape_html(snippet)));
    }

    if let Some(suggestion) = &issue.suggestion {
        block.push_str("<div class='suggestion'>\n<strong>💡 Suggestion:</strong><br/>\n");
        block.push_str(&multiline(suggestion));
        block.push_str("\n</div>\n");
    }

    block.push_str("</div>\n");
    block
}
