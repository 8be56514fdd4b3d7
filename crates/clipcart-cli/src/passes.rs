//! Stage-pass command handlers.
//!
//! Each handler runs one batch pass and prints a per-item outcome line;
//! a single item's failure never aborts the pass.

use clipcart_core::AppConfig;
use clipcart_media::{DownloadOutcome, FfmpegEncoder, RenderOutcome};
use clipcart_resolver::{
    DisabledTranslator, HttpPageInspector, HttpTranslator, SocialSearchClient,
};
use clipcart_uploader::HttpPublisher;
use uuid::Uuid;

/// Publish calls carry a whole video; they get a much longer leash than
/// page fetches.
const PUBLISH_TIMEOUT_SECS: u64 = 600;

pub(crate) async fn run_download(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    limit: Option<i64>,
    track: Option<&str>,
) -> anyhow::Result<()> {
    let inspector = HttpPageInspector::new(config.fetch_timeout_secs, &config.user_agent)?;
    let search = SocialSearchClient::new(config.fetch_timeout_secs, &config.user_agent)?;

    let outcomes = match &config.translate_endpoint {
        Some(endpoint) => {
            let translator =
                HttpTranslator::new(endpoint, config.fetch_timeout_secs, &config.user_agent)?;
            clipcart_media::run_download_pass(
                pool, config, &inspector, &search, &translator, limit, track,
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
                limit,
                track,
            )
            .await?
        }
    };

    print_download_outcomes(&outcomes);
    Ok(())
}

fn print_download_outcomes(outcomes: &[DownloadOutcome]) {
    for outcome in outcomes {
        if let Some(path) = &outcome.raw_path {
            println!("DOWNLOADED {} -> {}", outcome.origin_url, path.display());
        } else {
            println!("FAILED {}: {}", outcome.origin_url, outcome.message);
        }
    }
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    println!("download pass: {succeeded}/{} succeeded", outcomes.len());
}

pub(crate) async fn run_render(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    limit: Option<i64>,
    track: Option<&str>,
) -> anyhow::Result<()> {
    let outcomes =
        clipcart_media::run_render_pass(pool, config, &FfmpegEncoder, limit, track).await?;
    print_render_outcomes(&outcomes);
    Ok(())
}

fn print_render_outcomes(outcomes: &[RenderOutcome]) {
    for outcome in outcomes {
        if let Some(path) = &outcome.processed_path {
            println!("PROCESSED {} -> {}", outcome.origin_url, path.display());
        } else {
            println!("FAILED {}: {}", outcome.origin_url, outcome.message);
        }
    }
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    println!("render pass: {succeeded}/{} succeeded", outcomes.len());
}

pub(crate) async fn run_upload(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    channel: Option<Uuid>,
) -> anyhow::Result<()> {
    let Some(endpoint) = &config.publish_endpoint else {
        anyhow::bail!("CLIPCART_PUBLISH_ENDPOINT is not configured");
    };
    let publisher = HttpPublisher::new(
        endpoint,
        config.publish_token.as_deref(),
        PUBLISH_TIMEOUT_SECS,
    )?;

    let outcomes =
        clipcart_uploader::run_upload_pass(pool, &publisher, channel, chrono::Utc::now()).await?;

    for outcome in &outcomes {
        if let Some(post_url) = &outcome.post_url {
            println!(
                "UPLOADED {} [{}] -> {post_url}",
                outcome.video_asset_id, outcome.channel_name
            );
        } else {
            println!(
                "UPLOAD FAIL {} [{}]: {}",
                outcome.video_asset_id, outcome.channel_name, outcome.message
            );
        }
    }
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    println!("upload pass: {succeeded}/{} succeeded", outcomes.len());
    Ok(())
}
