//! src/client.rs

use crate::config::ReviewSettings;
use crate::errors::ReviewError;
use crate::model::{ReviewRequest, ReviewResponse, ReviewResult, WebhookPayload};
use log::{debug, error, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;

/// Header identifying the calling client on the webhook path.
pub const IDE_CLIENT_HEADER: &str = "X-IDE-Client";

const USER_AGENT: &str = concat!("mcp-review/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the review server.
///
/// One instance per configuration. Calls share nothing but the read-only
/// settings, so any number of them may be in flight at once.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    server_url: String,
    client_id: String,
    client: Client,
}

impl ReviewClient {
    pub fn new(settings: &ReviewSettings) -> Result<Self, ReviewError> {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));

        // Connect and read are bounded separately; there is no overall deadline.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(ReviewError::Transport)?;

        Ok(Self {
            server_url: settings.server_url.trim_end_matches('/').to_string(),
            client_id: settings.client_id.clone(),
            client,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// Submits a diff to `POST /review` and returns the typed review.
    pub async fn submit(
        &self,
        diff: &str,
        files: &[String],
        focus_areas: Option<Vec<String>>,
    ) -> Result<ReviewResult, ReviewError> {
        let mut request = ReviewRequest::new(diff, files);
        if let Some(areas) = focus_areas {
            request = request.with_focus_areas(areas);
        }

        let url = self.endpoint("/review");
        debug!("Submitting {} file(s) for review to {}", files.len(), url);

        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Review request to {} failed: {}", url, e);
                ReviewError::Transport(e)
            })?;

        let body = read_success_body(res).await?;

        let response: ReviewResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse review response: {}", e);
            ReviewError::protocol(format!("could not parse review response: {e}"), Some(body.clone()))
        })?;

        response.into_result()
    }

    /// Submits a diff to `POST /ide/review` and returns the raw body for the renderer.
    pub async fn submit_webhook(&self, diff: &str, files: &[String]) -> Result<String, ReviewError> {
        let payload = WebhookPayload::new(diff, files, &self.client_id);

        let url = self.endpoint("/ide/review");
        debug!("Submitting {} file(s) to webhook {}", files.len(), url);

        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(IDE_CLIENT_HEADER, &self.client_id)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Webhook request to {} failed: {}", url, e);
                ReviewError::Transport(e)
            })?;

        read_success_body(res).await
    }

    /// Advisory check against `GET /`. Every failure is reported as `false`.
    pub async fn check_health(&self) -> bool {
        let url = self.endpoint("/");
        match self.client.get(&url).send().await {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                warn!("Review server health check returned {}", res.status());
                false
            }
            Err(e) => {
                warn!("Review server health check failed: {}", e);
                false
            }
        }
    }
}

/// Reads the body of a response, mapping non-2xx statuses and empty bodies to errors.
async fn read_success_body(res: Response) -> Result<String, ReviewError> {
    let res_status = res.status();
    let body = res.text().await.map_err(ReviewError::Transport)?;

    if !res_status.is_success() {
        error!("Review server returned {}: {}", res_status, body);
        return Err(ReviewError::Server {
            status: res_status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Err(ReviewError::protocol("empty response body", None));
    }

    Ok(body)
}
