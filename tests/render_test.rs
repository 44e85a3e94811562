// tests/render_test.rs

use mcp_review::render::escape_html;
use mcp_review::{IssueSeverity, ResponseRenderer, ReviewError, ReviewIssue, ReviewResult};
use serde_json::json;

fn render(value: serde_json::Value) -> String {
    ResponseRenderer::new().render(&value.to_string())
}

fn issue_blocks(html: &str) -> usize {
    html.matches("<div class='issue ").count()
}

#[test]
fn renders_summary_and_every_issue_in_order() {
    let html = render(json!({
        "summary": "Two findings.\nBoth minor.",
        "score": 9,
        "issues": [
            {"severity": "low", "title": "Zeta first", "description": "d1", "category": "style"},
            {"severity": "high", "title": "Alpha second", "description": "d2", "category": "bugs"},
            {"severity": "medium", "title": "Mid third", "description": "line one\nline two", "category": "bugs"}
        ]
    }));

    assert!(html.contains("Two findings.<br/>Both minor."));
    assert!(html.contains("Issues Found (3)"));
    assert_eq!(issue_blocks(&html), 3);

    let zeta = html.find("Zeta first").unwrap();
    let alpha = html.find("Alpha second").unwrap();
    let mid = html.find("Mid third").unwrap();
    assert!(zeta < alpha && alpha < mid);
    assert!(html.contains("line one<br/>line two"));
}

#[test]
fn empty_issue_list_shows_positive_message() {
    let html = render(json!({"summary": "Clean", "score": 10, "issues": []}));
    assert!(html.contains("No Issues Found"));
    assert_eq!(issue_blocks(&html), 0);
}

fn minor_issue(title: &str) -> ReviewIssue {
    ReviewIssue {
        severity: "low".to_string(),
        title: title.to_string(),
        description: "Cosmetic".to_string(),
        category: "style".to_string(),
        file_path: None,
        line_number: None,
        suggestion: None,
        code_snippet: None,
    }
}

#[test]
fn empty_summary_stays_empty() {
    let result = ReviewResult {
        summary: String::new(),
        score: 7,
        issues: vec![],
        approval_recommended: false,
        block_merge: false,
    };
    let html = ResponseRenderer::new().render_result(&result);

    assert!(html.contains("<h2>📝 Summary</h2>\n<p></p>"));
    assert!(!html.contains("No summary available"));
}

#[test]
fn filter_that_hides_everything_reports_hidden_count() {
    let result = ReviewResult {
        summary: "Minor nits".to_string(),
        score: 8,
        issues: vec![minor_issue("Spacing"), minor_issue("Naming")],
        approval_recommended: false,
        block_merge: false,
    };
    let renderer = ResponseRenderer::new();

    let html = renderer.render_filtered(&result, IssueSeverity::Medium);
    assert!(html.contains("No Issues at or above medium"));
    assert!(html.contains("2 issue(s) below medium hidden."));
    assert!(!html.contains("Great job"));
    assert_eq!(issue_blocks(&html), 0);

    let html = renderer.render_filtered(&result, IssueSeverity::Low);
    assert!(html.contains("Issues Found (2)"));
    assert!(!html.contains("hidden"));
}

#[test]
fn non_json_falls_back_to_escaped_raw_text() {
    let raw = "Server says <b>hello</b> & goodbye\nsecond line";
    let html = ResponseRenderer::new().render(raw);

    assert!(html.contains(&format!("<pre>{}</pre>", escape_html(raw))));
    assert!(html.contains("&lt;b&gt;hello&lt;/b&gt;"));
    assert!(!html.contains("<b>hello</b>"));
    assert!(!html.contains("class='score"));
}

#[test]
fn fallback_never_fails_on_odd_input() {
    let renderer = ResponseRenderer::new();
    for raw in ["", "   ", "{", "[1, 2]", "null", "42", "\"quoted\"", "{\"score\":"] {
        let html = renderer.render(raw);
        assert!(html.contains("<h1>"), "no document for {raw:?}");
    }
}

#[test]
fn score_bands_map_to_classes() {
    for (score, class) in [
        (7, "score-warning"),
        (8, "score-good"),
        (5, "score-bad"),
        (10, "score-good"),
        (6, "score-warning"),
    ] {
        let html = render(json!({"score": score}));
        assert!(
            html.contains(&format!("class='score {class}'")),
            "score {score} should be {class}"
        );
    }
}

#[test]
fn recommendation_precedence() {
    let blocked = render(json!({"block_merge": true, "approval_recommended": true}));
    assert!(blocked.contains("Do not merge"));
    assert!(!blocked.contains("<strong>Approved</strong>"));

    let pending = render(json!({"block_merge": false, "approval_recommended": false}));
    assert!(pending.contains("Review recommended"));

    let approved = render(json!({"block_merge": false, "approval_recommended": true}));
    assert!(approved.contains("<strong>Approved</strong>"));

    let defaults = render(json!({}));
    assert!(defaults.contains("<strong>Approved</strong>"));
    assert!(defaults.contains("No summary available"));
    assert!(defaults.contains("Score: 0/10"));
}

#[test]
fn severity_classes_are_case_insensitive_with_info_fallback() {
    let html = render(json!({
        "issues": [
            {"severity": "CRITICAL", "title": "a"},
            {"severity": "Medium", "title": "b"},
            {"severity": "", "title": "c"},
            {"severity": null, "title": "d"},
            {"severity": "banana", "title": "e"},
            {"title": "f"}
        ]
    }));

    assert_eq!(html.matches("<div class='issue critical'>").count(), 1);
    assert_eq!(html.matches("<div class='issue medium'>").count(), 1);
    assert_eq!(html.matches("<div class='issue info'>").count(), 4);
    assert!(html.contains("🔴 a"));
    assert!(html.contains("ℹ️ e"));
}

#[test]
fn issue_location_and_suggestion_are_optional() {
    let html = render(json!({
        "issues": [
            {"severity": "high", "title": "with all", "file_path": "src/lib.rs", "line_number": 12,
             "suggestion": "Use ?\ninstead", "code_snippet": "x.unwrap()"},
            {"severity": "high", "title": "path only", "file_path": "src/main.rs"},
            {"severity": "high", "title": "bare"}
        ]
    }));

    assert!(html.contains("📁 src/lib.rs (Line 12)"));
    assert!(html.contains("📁 src/main.rs</p>"));
    assert_eq!(html.matches("class='suggestion'").count(), 1);
    assert!(html.contains("Use ?<br/>instead"));
    assert!(html.contains("<pre>x.unwrap()</pre>"));
}

#[test]
fn server_text_is_escaped() {
    let html = render(json!({
        "summary": "<script>alert(1)</script>",
        "issues": [{"title": "<img src=x>", "description": "a < b"}]
    }));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
    assert!(html.contains("a &lt; b"));
}

#[test]
fn welcome_lists_commands() {
    let html = ResponseRenderer::new().render_welcome();
    assert!(html.contains("Welcome!"));
    assert!(html.contains("mcp-review review --staged"));
    assert!(html.contains("mcp-review health"));
}

#[test]
fn error_document_includes_raw_body() {
    let error = ReviewError::Server {
        status: 502,
        body: "<h1>Bad Gateway</h1>".to_string(),
    };
    let html = ResponseRenderer::new().render_error(&error);
    assert!(html.contains("Review failed (server)"));
    assert!(html.contains("&lt;h1&gt;Bad Gateway&lt;/h1&gt;"));
}
