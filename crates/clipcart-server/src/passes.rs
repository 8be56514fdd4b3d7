//! Shared pass invocation for API handlers and scheduled jobs.

use clipcart_core::AppConfig;
use clipcart_media::FfmpegEncoder;
use clipcart_resolver::{
    DisabledTranslator, HttpPageInspector, HttpTranslator, SocialSearchClient,
};
use clipcart_uploader::HttpPublisher;
use sqlx::PgPool;

const PUBLISH_TIMEOUT_SECS: u64 = 600;

/// Counts reported back from one triggered pass.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub(crate) struct PassSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

pub(crate) async fn download_pass(
    pool: &PgPool,
    config: &AppConfig,
) -> anyhow::Result<PassSummary> {
    let inspector = HttpPageInspector::new(config.fetch_timeout_secs, &config.user_agent)?;
    let search = SocialSearchClient::new(config.fetch_timeout_secs, &config.user_agent)?;

    let outcomes = match &config.translate_endpoint {
        Some(endpoint) => {
            let translator =
                HttpTranslator::new(endpoint, config.fetch_timeout_secs, &config.user_agent)?;
            clipcart_media::run_download_pass(
                pool, config, &inspector, &search, &translator, None, None,
            )
            .await?
        }
        None => {
            clipcart_media::run_download_pass(
                pool,
                config,
                &inspector,
                &search,
                &DisabledTranslator,
                None,
                None,
            )
            .await?
        }
    };

    Ok(PassSummary {
        attempted: outcomes.len(),
        succeeded: outcomes.iter().filter(|o| o.success).count(),
    })
}

pub(crate) async fn render_pass(pool: &PgPool, config: &AppConfig) -> anyhow::Result<PassSummary> {
    let outcomes =
        clipcart_media::run_render_pass(pool, config, &FfmpegEncoder, None, None).await?;
    Ok(PassSummary {
        attempted: outcomes.len(),
        succeeded: outcomes.iter().filter(|o| o.success).count(),
    })
}

pub(crate) async fn upload_pass(pool: &PgPool, config: &AppConfig) -> anyhow::Result<PassSummary> {
    let Some(endpoint) = &config.publish_endpoint else {
        anyhow::bail!("CLIPCART_PUBLISH_ENDPOINT is not configured");
    };
    let publisher = HttpPublisher::new(
        endpoint,
        config.publish_token.as_deref(),
        PUBLISH_TIMEOUT_SECS,
    )?;

    let outcomes =
        clipcart_uploader::run_upload_pass(pool, &publisher, None, chrono::Utc::now()).await?;
    Ok(PassSummary {
        attempted: outcomes.len(),
        succeeded: outcomes.iter().filter(|o| o.success).count(),
    })
}
