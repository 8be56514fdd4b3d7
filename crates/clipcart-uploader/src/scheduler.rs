//! Quota-aware upload scheduling.
//!
//! Each pass evaluates every active channel independently and idempotently:
//! quota is read fresh from the upload log at the start of the channel's
//! pass (the store is the only synchronization point), candidates are taken
//! oldest-first, and every attempt — success or failure — appends a log row.
//! One candidate's failure never aborts the channel; one channel's failure
//! never aborts the pass.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clipcart_core::presentation::{build_description, build_title};
use clipcart_core::{PipelineStatus, ProductStatus, UploadStatus};
use clipcart_db::{ChannelRow, NewUploadLog, UploadLogRow, VideoAssetRow};

use crate::backoff::next_retry_at;
use crate::error::UploadError;
use crate::publisher::{PublishError, PublishErrorKind, PublishRequest, Publisher};

/// Width of the sliding quota window, in hours.
const QUOTA_WINDOW_HOURS: i64 = 24;

/// Per-attempt result of one upload pass.
#[derive(Debug)]
pub struct UploadOutcome {
    pub channel_id: Uuid,
    pub channel_name: String,
    pub video_asset_id: Uuid,
    pub success: bool,
    pub post_url: Option<String>,
    pub message: String,
}

/// Remaining quota after counting recent successes. Never negative, even if
/// an operator lowered the limit below what already went out.
#[must_use]
pub fn remaining_quota(daily_upload_limit: i32, recent_successes: i64) -> i64 {
    (i64::from(daily_upload_limit) - recent_successes).max(0)
}

/// Retry gate: a candidate whose most recent attempt failed with an active
/// backoff is held back. Successes, missing logs, and expired backoffs all
/// pass.
///
/// A `FAILED` log with no `next_retry_at` is a terminal failure (auth,
/// duplicate): it stays blocked while the asset is still in `ERROR`, so a
/// broken credential never causes a retry storm. Operator intervention is
/// moving the asset out of `ERROR` (reset or re-render), which reopens the
/// gate.
#[must_use]
pub fn retry_gate_allows(
    latest: Option<&UploadLogRow>,
    asset_status: &str,
    now: DateTime<Utc>,
) -> bool {
    let Some(latest) = latest else {
        return true;
    };
    if latest.status != UploadStatus::Failed.as_str() {
        return true;
    }
    match latest.next_retry_at {
        Some(retry_at) => retry_at <= now,
        None => asset_status != PipelineStatus::Error.as_str(),
    }
}

/// Runs one scheduling pass over all active channels (or one, when
/// `channel_filter` is set), pinned to `now` for the quota window and
/// backoff arithmetic.
///
/// # Errors
///
/// Returns [`UploadError`] only when the channel list itself cannot be
/// loaded; channel-level failures are logged and skipped.
pub async fn run_upload_pass<P: Publisher>(
    pool: &PgPool,
    publisher: &P,
    channel_filter: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<UploadOutcome>, UploadError> {
    let channels = clipcart_db::list_active_channels(pool).await?;
    let channels: Vec<ChannelRow> = match channel_filter {
        Some(id) => channels.into_iter().filter(|c| c.id == id).collect(),
        None => channels,
    };

    let mut outcomes = Vec::new();
    for channel in &channels {
        match run_channel_pass(pool, publisher, channel, now).await {
            Ok(channel_outcomes) => outcomes.extend(channel_outcomes),
            Err(e) => {
                // A channel-level failure abandons only this channel's
                // remaining work for the pass.
                tracing::error!(
                    channel = %channel.channel_name,
                    error = %e,
                    "channel pass failed"
                );
            }
        }
    }

    Ok(outcomes)
}

/// Processes one channel: quota check, candidate selection, retry gate,
/// attempts in FIFO order.
async fn run_channel_pass<P: Publisher>(
    pool: &PgPool,
    publisher: &P,
    channel: &ChannelRow,
    now: DateTime<Utc>,
) -> Result<Vec<UploadOutcome>, UploadError> {
    let cutoff = now - Duration::hours(QUOTA_WINDOW_HOURS);
    let recent = clipcart_db::count_recent_successes(pool, channel.id, cutoff).await?;
    let remaining = remaining_quota(channel.daily_upload_limit, recent);
    if remaining == 0 {
        tracing::info!(
            channel = %channel.channel_name,
            recent,
            limit = channel.daily_upload_limit,
            "daily limit reached; skipping channel"
        );
        return Ok(Vec::new());
    }

    // Quota is computed once per pass, before the loop. A success inside
    // the loop is already counted against `remaining` by the LIMIT below.
    let candidates = clipcart_db::list_upload_candidates(pool, channel.id, remaining).await?;

    let mut outcomes = Vec::new();
    for asset in &candidates {
        let latest = clipcart_db::latest_log_for_asset(pool, asset.id).await?;
        if !retry_gate_allows(latest.as_ref(), &asset.status, now) {
            tracing::debug!(
                asset_id = %asset.id,
                "backoff still active; skipping candidate"
            );
            continue;
        }

        let outcome = attempt_upload(pool, publisher, channel, asset, now).await?;
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// One publish attempt: verify the artifact, call the publisher, record the
/// result. Always appends exactly one log row.
async fn attempt_upload<P: Publisher>(
    pool: &PgPool,
    publisher: &P,
    channel: &ChannelRow,
    asset: &VideoAssetRow,
    now: DateTime<Utc>,
) -> Result<UploadOutcome, UploadError> {
    let title = match clipcart_db::get_product(pool, asset.product_id).await? {
        Some(product) => product.title,
        None => asset.source_url.clone(),
    };
    let title = build_title(channel.title_prefix.as_deref(), &title);
    let description = build_description(&title, channel.hashtag_template.as_deref());

    // The artifact must still exist on disk; a missing file is a normal
    // classified failure, not a special case outside the log.
    let file_path = asset.processed_path.as_deref().map(std::path::Path::new);
    let artifact = match file_path {
        Some(path) if path.exists() => Ok(path),
        Some(path) => Err(PublishError::new(
            PublishErrorKind::Unknown,
            format!("processed file missing: {}", path.display()),
        )),
        None => Err(PublishError::new(
            PublishErrorKind::Unknown,
            "processed path not recorded",
        )),
    };

    let published = match artifact {
        Ok(path) => {
            let empty_tags: Vec<String> = Vec::new();
            let request = PublishRequest {
                file_path: path,
                title: &title,
                description: &description,
                tags: asset.hashtags.as_ref().unwrap_or(&empty_tags),
                privacy: "public",
                scheduled_publish_time: None,
            };
            publisher.publish(&request).await
        }
        Err(e) => Err(e),
    };

    match published {
        Ok(post_url) => {
            // The SUCCESS log lands first: an asset is never UPLOADED
            // without a prior SUCCESS row.
            clipcart_db::insert_upload_log(
                pool,
                &NewUploadLog {
                    video_asset_id: asset.id,
                    platform: channel.platform.clone(),
                    post_url: Some(post_url.clone()),
                    scheduled_at: None,
                    published_at: Some(now),
                    next_retry_at: None,
                    status: UploadStatus::Success.as_str().to_string(),
                    is_published: true,
                },
            )
            .await?;
            clipcart_db::update_video_status(
                pool,
                asset.id,
                PipelineStatus::Uploaded.as_str(),
                None,
            )
            .await?;
            clipcart_db::update_product_status(
                pool,
                asset.product_id,
                ProductStatus::Uploaded.as_str(),
                None,
            )
            .await?;

            tracing::info!(
                channel = %channel.channel_name,
                asset_id = %asset.id,
                %post_url,
                "upload succeeded"
            );
            Ok(UploadOutcome {
                channel_id: channel.id,
                channel_name: channel.channel_name.clone(),
                video_asset_id: asset.id,
                success: true,
                post_url: Some(post_url),
                message: "uploaded".to_string(),
            })
        }
        Err(e) => {
            let retry_at = next_retry_at(e.kind, now);
            let message = e.to_string();

            clipcart_db::update_video_status(
                pool,
                asset.id,
                PipelineStatus::Error.as_str(),
                Some(&message),
            )
            .await?;
            clipcart_db::insert_upload_log(
                pool,
                &NewUploadLog {
                    video_asset_id: asset.id,
                    platform: channel.platform.clone(),
                    post_url: None,
                    scheduled_at: None,
                    published_at: None,
                    next_retry_at: retry_at,
                    status: UploadStatus::Failed.as_str().to_string(),
                    is_published: false,
                },
            )
            .await?;

            tracing::warn!(
                channel = %channel.channel_name,
                asset_id = %asset.id,
                error = %message,
                "upload failed"
            );
            Ok(UploadOutcome {
                channel_id: channel.id,
                channel_name: channel.channel_name.clone(),
                video_asset_id: asset.id,
                success: false,
                post_url: None,
                message,
            })
        }
    }
}
