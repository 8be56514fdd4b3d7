//! Database operations for `channels`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: Uuid,
    pub channel_name: String,
    pub platform: String,
    pub upload_mode: String,
    /// Maximum `SUCCESS` uploads inside any trailing 24-hour window.
    /// Zero means the channel is never selected by the upload scheduler.
    pub daily_upload_limit: i32,
    pub subtitle_style: String,
    pub tone: String,
    pub hashtag_template: Option<String>,
    pub title_prefix: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const CHANNEL_COLUMNS: &str = "id, channel_name, platform, upload_mode, daily_upload_limit, \
     subtitle_style, tone, hashtag_template, title_prefix, active, created_at, updated_at";

/// Upserts a channel from its seed-file declaration.
///
/// Conflicts on `(channel_name, platform)` update every configurable field
/// in place, so re-seeding is idempotent. Returns the channel's `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_channel_seed(
    pool: &PgPool,
    seed: &clipcart_core::ChannelSeed,
) -> Result<Uuid, DbError> {
    let new_id = Uuid::new_v4();

    let id: Uuid = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO channels \
             (id, channel_name, platform, upload_mode, daily_upload_limit, \
              subtitle_style, tone, hashtag_template, title_prefix, active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (channel_name, platform) DO UPDATE SET \
             upload_mode        = EXCLUDED.upload_mode, \
             daily_upload_limit = EXCLUDED.daily_upload_limit, \
             subtitle_style     = EXCLUDED.subtitle_style, \
             tone               = EXCLUDED.tone, \
             hashtag_template   = EXCLUDED.hashtag_template, \
             title_prefix       = EXCLUDED.title_prefix, \
             active             = EXCLUDED.active, \
             updated_at         = NOW() \
         RETURNING id",
    )
    .bind(new_id)
    .bind(&seed.name)
    .bind(&seed.platform)
    .bind(&seed.upload_mode)
    .bind(seed.daily_upload_limit)
    .bind(&seed.subtitle_style)
    .bind(&seed.tone)
    .bind(&seed.hashtag_template)
    .bind(&seed.title_prefix)
    .bind(seed.active)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists channels with `active = TRUE`, ordered by name for stable output.
///
/// Disabled channels are invisible to the upload scheduler by contract.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_channels(pool: &PgPool) -> Result<Vec<ChannelRow>, DbError> {
    let rows = sqlx::query_as::<_, ChannelRow>(&format!(
        "SELECT {CHANNEL_COLUMNS} \
         FROM channels \
         WHERE active = TRUE \
         ORDER BY channel_name ASC, platform ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a single channel by `id`, if it exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_channel(pool: &PgPool, id: Uuid) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
