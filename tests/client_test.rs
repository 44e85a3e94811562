// tests/client_test.rs

use mcp_review::client::IDE_CLIENT_HEADER;
use mcp_review::{ReviewClient, ReviewError, ReviewSettings};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

const REVIEW_BODY: &str = r#"{
    "status": "success",
    "review": {
        "summary": "Mostly fine.\nOne leak.",
        "score": 7,
        "issues": [
            {"severity": "high", "title": "Leaked handle", "description": "File is never closed", "category": "bugs", "file_path": "src/io.rs", "line_number": 42},
            {"severity": "low", "title": "Naming", "description": "Prefer snake_case", "category": "code_quality"}
        ],
        "approval_recommended": false,
        "block_merge": false
    }
}"#;

fn settings_for(url: &str) -> ReviewSettings {
    ReviewSettings {
        server_url: url.to_string(),
        timeout_secs: 5,
        ..ReviewSettings::default()
    }
}

fn files() -> Vec<String> {
    vec!["src/io.rs".to_string()]
}

/// Address nothing listens on.
fn refused_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn submit_returns_review_in_server_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/review")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "diff": "+let x = 1;",
            "files": ["src/io.rs"],
            "focus_areas": ["compilation", "security", "performance", "bugs", "code_quality"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REVIEW_BODY)
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    let review = client.submit("+let x = 1;", &files(), None).await.unwrap();

    assert_eq!(review.score, 7);
    assert_eq!(review.summary, "Mostly fine.\nOne leak.");
    let titles: Vec<_> = review.issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Leaked handle", "Naming"]);
    assert_eq!(review.issues[0].line_number, Some(42));
    assert!(!review.approval_recommended);

    mock.assert_async().await;
}

#[tokio::test]
async fn submit_sends_custom_focus_areas() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/review")
        .match_body(Matcher::PartialJson(json!({"focus_areas": ["security"]})))
        .with_status(200)
        .with_body(REVIEW_BODY)
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    client
        .submit("diff", &files(), Some(vec!["security".to_string()]))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn trailing_slash_in_server_url_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/review")
        .with_status(200)
        .with_body(REVIEW_BODY)
        .create_async()
        .await;

    let url = format!("{}/", server.url());
    let client = ReviewClient::new(&settings_for(&url)).unwrap();
    assert!(client.submit("diff", &files(), None).await.is_ok());

    mock.assert_async().await;
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let client = ReviewClient::new(&settings_for(&refused_address())).unwrap();
    match client.submit("diff", &files(), None).await {
        Err(ReviewError::Transport(_)) => {}
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_failure_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/review")
        .with_status(500)
        .with_body("internal explosion")
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    match client.submit("diff", &files(), None).await {
        Err(ReviewError::Server { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal explosion");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn application_failure_carries_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/review")
        .with_status(200)
        .with_body(r#"{"status":"error","message":"bad diff"}"#)
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    match client.submit("diff", &files(), None).await {
        Err(ReviewError::Application(message)) => assert_eq!(message, "bad diff"),
        other => panic!("expected application error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_keeps_raw_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/review")
        .with_status(200)
        .with_body("<html>proxy page</html>")
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    let err = client.submit("diff", &files(), None).await.unwrap_err();
    assert!(matches!(err, ReviewError::Protocol { .. }));
    assert_eq!(err.raw_body(), Some("<html>proxy page</html>"));
}

#[tokio::test]
async fn empty_body_is_a_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/review")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    let err = client.submit("diff", &files(), None).await.unwrap_err();
    assert!(matches!(err, ReviewError::Protocol { body: None, .. }));
}

#[tokio::test]
async fn concurrent_submissions_do_not_interfere() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/review")
        .match_body(Matcher::PartialJson(json!({"diff": "first"})))
        .with_status(200)
        .with_body(r#"{"status":"success","review":{"summary":"one","score":9,"issues":[]}}"#)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/review")
        .match_body(Matcher::PartialJson(json!({"diff": "second"})))
        .with_status(200)
        .with_body(r#"{"status":"success","review":{"summary":"two","score":3,"issues":[]}}"#)
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    let files = files();
    let (a, b) = futures::join!(
        client.submit("first", &files, None),
        client.submit("second", &files, None)
    );

    assert_eq!(a.unwrap().summary, "one");
    assert_eq!(b.unwrap().summary, "two");
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn webhook_sends_envelope_and_client_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ide/review")
        .match_header("content-type", "application/json")
        .match_header(IDE_CLIENT_HEADER, "mcp-review")
        .match_body(Matcher::Json(json!({
            "action": "ide_review",
            "diff": "+fn main() {}",
            "files": ["src/io.rs"],
            "source": "mcp-review"
        })))
        .with_status(200)
        .with_body("plain text answer")
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    let raw = client.submit_webhook("+fn main() {}", &files()).await.unwrap();
    assert_eq!(raw, "plain text answer");

    mock.assert_async().await;
}

#[tokio::test]
async fn webhook_failure_carries_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ide/review")
        .with_status(404)
        .with_body("no such route")
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    match client.submit_webhook("diff", &files()).await {
        Err(ReviewError::Server { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such route");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn health_is_true_on_success_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"status":"healthy"}"#)
        .create_async()
        .await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    assert!(client.check_health().await);
    mock.assert_async().await;
}

#[tokio::test]
async fn health_is_false_on_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/").with_status(503).create_async().await;

    let client = ReviewClient::new(&settings_for(&server.url())).unwrap();
    assert!(!client.check_health().await);
}

#[tokio::test]
async fn health_is_false_when_refused() {
    let client = ReviewClient::new(&settings_for(&refused_address())).unwrap();
    assert!(!client.check_health().await);
}

#[tokio::test]
async fn health_is_false_when_server_never_answers() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let settings = ReviewSettings {
        server_url: format!("http://{addr}"),
        timeout_secs: 1,
        ..ReviewSettings::default()
    };
    let client = ReviewClient::new(&settings).unwrap();

    let healthy = tokio::time::timeout(Duration::from_secs(10), client.check_health())
        .await
        .expect("read timeout should end the health check");
    assert!(!healthy);
}
