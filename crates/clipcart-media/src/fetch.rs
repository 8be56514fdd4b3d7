//! Streaming download of a candidate video URL.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::MediaError;
use crate::retry::retry_with_backoff;

/// HTTP client for candidate downloads.
///
/// Streams the body straight to the target file; any failure removes the
/// partial file before the error is returned, so a failed candidate never
/// leaves debris for the next one. Transient failures (timeouts, connect
/// errors, 429/5xx) are retried with exponential backoff.
pub struct MediaFetcher {
    client: reqwest::Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl MediaFetcher {
    /// Creates a fetcher with the configured download timeout, `User-Agent`,
    /// and retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Downloads `url` into `target`, sending `referer` when known.
    ///
    /// # Errors
    ///
    /// - [`MediaError::UnexpectedStatus`] on a non-2xx response (5xx and 429
    ///   only after all retries are exhausted).
    /// - [`MediaError::Http`] on network or timeout failure mid-stream.
    /// - [`MediaError::Io`] if the file cannot be written.
    ///
    /// In every error case the partially-written target is deleted, so each
    /// retry starts from a clean slate.
    pub async fn download(
        &self,
        url: &str,
        target: &Path,
        referer: Option<&str>,
    ) -> Result<(), MediaError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let result = self.download_inner(url, target, referer).await;
            if result.is_err() {
                let _ = tokio::fs::remove_file(target).await;
            }
            result
        })
        .await
    }

    async fn download_inner(
        &self,
        url: &str,
        target: &Path,
        referer: Option<&str>,
    ) -> Result<(), MediaError> {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut file = tokio::fs::File::create(target).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn download_writes_the_body_to_the_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");

        let fetcher = MediaFetcher::new(5, "test-agent", 0, 0).unwrap();
        fetcher
            .download(&format!("{}/clip.mp4", server.uri()), &target, None)
            .await
            .unwrap();

        assert_eq!(std::fs::metadata(&target).unwrap().len(), 4096);
    }

    #[tokio::test]
    async fn transient_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");

        let fetcher = MediaFetcher::new(5, "test-agent", 3, 0).unwrap();
        fetcher.download(&server.uri(), &target, None).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn download_sends_referer_when_known() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("referer", "https://site/x"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");

        let fetcher = MediaFetcher::new(5, "test-agent", 0, 0).unwrap();
        fetcher
            .download(&server.uri(), &target, Some("https://site/x"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_download_removes_the_partial_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");

        let fetcher = MediaFetcher::new(5, "test-agent", 0, 0).unwrap();
        let result = fetcher.download(&server.uri(), &target, None).await;

        assert!(matches!(
            result,
            Err(MediaError::UnexpectedStatus { status: 404, .. })
        ));
        assert!(!target.exists(), "partial file must be cleaned up");
    }
}
