//! Boundary types for the rendered-page collaborator.
//!
//! Driving a real browser (rendering, scrolling, clicking videos into
//! playback) is outside this crate; whatever does it hands the resolver a
//! [`PageSnapshot`]. [`HttpPageInspector`] is the built-in degraded-mode
//! collaborator: a plain HTML fetch with no script execution, which still
//! feeds the structured-data and raw-HTML strategies.

use std::time::Duration;

use crate::error::ResolverError;
use crate::runtime_data::extract_runtime_payloads;

/// One captured in-flight response observed while the page loaded.
#[derive(Debug, Clone, Default)]
pub struct NetworkCapture {
    pub url: String,
    pub content_type: String,
    /// Browser resource classification (`"media"`, `"xhr"`, ...) when known.
    pub resource_type: Option<String>,
    /// Response body text, captured only for JSON-ish responses.
    pub body: Option<String>,
}

/// Everything the resolver can mine from one page visit.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// `src`/`currentSrc` values of rendered `<video>` and `<video><source>`
    /// elements.
    pub video_sources: Vec<String>,
    /// Passively captured responses, in arrival order.
    pub network: Vec<NetworkCapture>,
    /// Resource-timing entry URLs scanned after load settled.
    pub resource_urls: Vec<String>,
    /// Script payloads found under known runtime-data globals.
    pub runtime_payloads: Vec<serde_json::Value>,
    /// Raw page HTML.
    pub html: String,
}

/// Produces a [`PageSnapshot`] for a listing URL.
pub trait PageInspector {
    fn inspect(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<PageSnapshot, ResolverError>> + Send;
}

/// Scriptless inspector: fetches the page HTML and mines embedded runtime
/// payloads out of it. Rendered video elements and network captures stay
/// empty, so only the structured-data and raw-HTML strategies see input.
pub struct HttpPageInspector {
    client: reqwest::Client,
}

impl HttpPageInspector {
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageInspector for HttpPageInspector {
    async fn inspect(&self, url: &str) -> Result<PageSnapshot, ResolverError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let html = response.text().await?;
        let runtime_payloads = extract_runtime_payloads(&html);

        Ok(PageSnapshot {
            runtime_payloads,
            html,
            ..PageSnapshot::default()
        })
    }
}
