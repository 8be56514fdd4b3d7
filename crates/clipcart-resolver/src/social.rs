//! Cross-platform social search fallback.
//!
//! When a listing page yields nothing, the product title is searched on
//! short-video platforms in a fixed priority order and the first hit's page
//! URL is returned as the candidate. Per-platform failures fall through to
//! the next platform.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::ResolverError;

/// Search endpoints, overridable for tests.
#[derive(Debug, Clone)]
pub struct SearchBases {
    pub tiktok: String,
    pub instagram: String,
    pub dailymotion: String,
    pub youtube: String,
}

impl Default for SearchBases {
    fn default() -> Self {
        Self {
            tiktok: "https://www.tiktok.com".to_string(),
            instagram: "https://www.instagram.com".to_string(),
            dailymotion: "https://www.dailymotion.com".to_string(),
            youtube: "https://www.youtube.com".to_string(),
        }
    }
}

/// HTTP client over the public search pages of the fallback platforms.
pub struct SocialSearchClient {
    client: reqwest::Client,
    bases: SearchBases,
}

impl SocialSearchClient {
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ResolverError> {
        Self::with_bases(timeout_secs, user_agent, SearchBases::default())
    }

    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn with_bases(
        timeout_secs: u64,
        user_agent: &str,
        bases: SearchBases,
    ) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, bases })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ResolverError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// Searches TikTok for the first matching video page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the search page cannot be fetched.
    pub async fn find_tiktok_video(&self, query: &str) -> Result<Option<String>, ResolverError> {
        let q = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let url = format!("{}/search?q={q}", self.bases.tiktok);
        let html = self.fetch_page(&url).await?;
        let re = regex::Regex::new(r#"https?://www\.tiktok\.com/@[^\s"']+/video/\d+"#)
            .expect("valid regex");
        Ok(re.find(&html).map(|m| m.as_str().to_string()))
    }

    /// Searches Instagram's keyword explorer for the first reel URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the search page cannot be fetched.
    pub async fn find_instagram_reel(&self, query: &str) -> Result<Option<String>, ResolverError> {
        let q = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let url = format!(
            "{}/explore/search/keyword/?q={q}",
            self.bases.instagram
        );
        let html = self.fetch_page(&url).await?;
        let re = regex::Regex::new(r#"https?://www\.instagram\.com/reel/[^\s"'\\]+"#)
            .expect("valid regex");
        Ok(re.find(&html).map(|m| m.as_str().to_string()))
    }

    /// Searches Dailymotion and rebuilds the canonical video URL from the
    /// first `/video/<id>` reference on the results page.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the search page cannot be fetched.
    pub async fn find_dailymotion_video(
        &self,
        query: &str,
    ) -> Result<Option<String>, ResolverError> {
        let q = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let url = format!("{}/search/{q}/videos", self.bases.dailymotion);
        let html = self.fetch_page(&url).await?;
        let re = regex::Regex::new(r"/video/([a-zA-Z0-9]+)").expect("valid regex");
        Ok(re
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|id| format!("https://www.dailymotion.com/video/{}", id.as_str())))
    }

    /// Searches YouTube results and rebuilds a watch URL from the first
    /// embedded `videoId`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the search page cannot be fetched.
    pub async fn find_youtube_video(&self, query: &str) -> Result<Option<String>, ResolverError> {
        let q = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let url = format!("{}/results?search_query={q}", self.bases.youtube);
        let html = self.fetch_page(&url).await?;
        let re = regex::Regex::new(r#""videoId"\s*:\s*"([A-Za-z0-9_-]{11})""#)
            .expect("valid regex");
        Ok(re
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|id| format!("https://www.youtube.com/watch?v={}", id.as_str())))
    }

    /// Runs the platform cascade: every query on TikTok, then Instagram,
    /// then Dailymotion, then YouTube. The first hit wins; per-query
    /// failures are logged and skipped.
    pub async fn find_social_video(&self, queries: &[String]) -> Option<String> {
        for query in queries {
            match self.find_tiktok_video(query).await {
                Ok(Some(url)) => {
                    tracing::debug!(%query, %url, "tiktok search hit");
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%query, error = %e, "tiktok search failed"),
            }
        }
        for query in queries {
            match self.find_instagram_reel(query).await {
                Ok(Some(url)) => {
                    tracing::debug!(%query, %url, "instagram search hit");
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%query, error = %e, "instagram search failed"),
            }
        }
        for query in queries {
            match self.find_dailymotion_video(query).await {
                Ok(Some(url)) => {
                    tracing::debug!(%query, %url, "dailymotion search hit");
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%query, error = %e, "dailymotion search failed"),
            }
        }
        for query in queries {
            match self.find_youtube_video(query).await {
                Ok(Some(url)) => {
                    tracing::debug!(%query, %url, "youtube search hit");
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(%query, error = %e, "youtube search failed"),
            }
        }
        None
    }
}
