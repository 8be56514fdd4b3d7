//! Database operations for `video_assets`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `video_assets` table.
///
/// One active asset per product in this design; `source_url` is the unique
/// key, so re-resolving the same source updates the row in place.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoAssetRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub affiliate_link_id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    pub source_url: String,
    pub raw_path: Option<String>,
    pub processed_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub language: Option<String>,
    pub duration_sec: Option<i32>,
    pub hashtags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for [`upsert_video_asset`].
#[derive(Debug, Clone, Default)]
pub struct NewVideoAsset {
    pub product_id: Uuid,
    pub affiliate_link_id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    pub source_url: String,
    pub raw_path: Option<String>,
    pub processed_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub language: Option<String>,
    pub duration_sec: Option<i32>,
    pub hashtags: Option<Vec<String>>,
}

const ASSET_COLUMNS: &str = "id, product_id, affiliate_link_id, channel_id, source_url, \
     raw_path, processed_path, thumbnail_path, status, error_message, language, \
     duration_sec, hashtags, created_at, updated_at";

// ---------------------------------------------------------------------------
// video_assets operations
// ---------------------------------------------------------------------------

/// Upserts a video asset.
///
/// Conflicts on `source_url` update paths, linkage, status, and metadata in
/// place. An asset cannot reach `PROCESSED` without a processed path —
/// callers set both together through this function.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_video_asset(
    pool: &PgPool,
    asset: &NewVideoAsset,
) -> Result<VideoAssetRow, DbError> {
    let new_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, VideoAssetRow>(&format!(
        "INSERT INTO video_assets \
             (id, product_id, affiliate_link_id, channel_id, source_url, raw_path, \
              processed_path, thumbnail_path, status, error_message, language, \
              duration_sec, hashtags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT (source_url) DO UPDATE SET \
             product_id        = EXCLUDED.product_id, \
             affiliate_link_id = EXCLUDED.affiliate_link_id, \
             channel_id        = EXCLUDED.channel_id, \
             raw_path          = EXCLUDED.raw_path, \
             processed_path    = EXCLUDED.processed_path, \
             thumbnail_path    = EXCLUDED.thumbnail_path, \
             status            = EXCLUDED.status, \
             error_message     = EXCLUDED.error_message, \
             language          = EXCLUDED.language, \
             duration_sec      = EXCLUDED.duration_sec, \
             hashtags          = EXCLUDED.hashtags, \
             updated_at        = NOW() \
         RETURNING {ASSET_COLUMNS}"
    ))
    .bind(new_id)
    .bind(asset.product_id)
    .bind(asset.affiliate_link_id)
    .bind(asset.channel_id)
    .bind(&asset.source_url)
    .bind(&asset.raw_path)
    .bind(&asset.processed_path)
    .bind(&asset.thumbnail_path)
    .bind(&asset.status)
    .bind(&asset.error_message)
    .bind(&asset.language)
    .bind(asset.duration_sec)
    .bind(&asset.hashtags)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Sets an asset's status and error message.
///
/// Pass `error_message = None` to clear a previous failure (the scheduler
/// does this when an upload finally succeeds).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_video_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE video_assets \
         SET status = $1, error_message = $2, updated_at = NOW() \
         WHERE id = $3",
    )
    .bind(status)
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Returns the most recent asset for a product, if any.
///
/// Ordered by `created_at DESC, id DESC` so the first row is always the
/// latest even when timestamps collide.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_asset_for_product(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Option<VideoAssetRow>, DbError> {
    let row = sqlx::query_as::<_, VideoAssetRow>(&format!(
        "SELECT {ASSET_COLUMNS} \
         FROM video_assets \
         WHERE product_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists a channel's upload candidates in FIFO order.
///
/// Candidates are assets in `PROCESSED` or `ERROR` (an errored upload is
/// retryable once its backoff expires), ordered oldest-first and capped to
/// the channel's remaining quota for this pass.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_upload_candidates(
    pool: &PgPool,
    channel_id: Uuid,
    limit: i64,
) -> Result<Vec<VideoAssetRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoAssetRow>(&format!(
        "SELECT {ASSET_COLUMNS} \
         FROM video_assets \
         WHERE channel_id = $1 \
           AND status IN ('PROCESSED', 'ERROR') \
         ORDER BY created_at ASC, id ASC \
         LIMIT $2"
    ))
    .bind(channel_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
