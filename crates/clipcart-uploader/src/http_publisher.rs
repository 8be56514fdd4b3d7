//! HTTP publisher implementation.
//!
//! Posts the rendered file and its metadata as one multipart request to a
//! configured platform upload endpoint, authenticated with a bearer token.
//! OAuth refresh and per-platform request shapes live behind that endpoint,
//! not here.

use std::time::Duration;

use serde::Deserialize;

use crate::error::UploadError;
use crate::publisher::{PublishError, PublishErrorKind, PublishRequest, Publisher};

#[derive(Debug, Deserialize)]
struct PublishResponse {
    post_url: String,
}

/// Publisher over a platform upload endpoint.
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpPublisher {
    /// # Errors
    ///
    /// Returns [`UploadError::Setup`] if the underlying client cannot be
    /// constructed.
    pub fn new(
        endpoint: &str,
        token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UploadError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.map(str::to_string),
        })
    }

    /// Map a response status to a failure kind; 4xx statuses carry their
    /// meaning directly, anything else falls back to message classification.
    fn classify_status(status: reqwest::StatusCode, body: &str) -> PublishErrorKind {
        match status.as_u16() {
            401 | 403 => {
                // 403 is also how quota exhaustion arrives; let the body text
                // break the tie before assuming a credential problem.
                let from_body = PublishErrorKind::from_message(body);
                if from_body == PublishErrorKind::Unknown {
                    PublishErrorKind::Auth
                } else {
                    from_body
                }
            }
            409 => PublishErrorKind::Duplicate,
            429 => PublishErrorKind::Quota,
            _ => PublishErrorKind::from_message(body),
        }
    }
}

impl Publisher for HttpPublisher {
    async fn publish(&self, request: &PublishRequest<'_>) -> Result<String, PublishError> {
        let file_bytes = tokio::fs::read(request.file_path).await.map_err(|e| {
            PublishError::new(
                PublishErrorKind::Unknown,
                format!("failed to read artifact: {e}"),
            )
        })?;
        let file_name = request
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());

        let file_part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str("video/mp4")
            .map_err(|e| PublishError::new(PublishErrorKind::Unknown, e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("title", request.title.to_string())
            .text("description", request.description.to_string())
            .text("tags", request.tags.join(","))
            .text("privacy", request.privacy.to_string());
        if let Some(publish_at) = request.scheduled_publish_time {
            form = form.text("scheduled_publish_time", publish_at.to_rfc3339());
        }

        let mut http_request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Unknown, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let kind = Self::classify_status(status, &body);
            return Err(PublishError::new(
                kind,
                format!("publish endpoint returned {status}: {body}"),
            ));
        }

        let parsed: PublishResponse = response
            .json()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Unknown, e.to_string()))?;
        Ok(parsed.post_url)
    }
}
