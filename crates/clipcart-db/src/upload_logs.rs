//! Database operations for `upload_logs`.
//!
//! The log is append-only: every publish attempt inserts a new row, and the
//! most recent row for an asset decides its current retry eligibility. There
//! is deliberately no update function here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `upload_logs` table — one publish attempt.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadLogRow {
    pub id: Uuid,
    pub video_asset_id: Uuid,
    pub platform: String,
    pub post_url: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    /// Earliest instant a failed attempt may be retried. `None` on a
    /// `FAILED` row means the failure needs operator intervention.
    pub next_retry_at: Option<DateTime<Utc>>,
    pub status: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Field set for [`insert_upload_log`].
#[derive(Debug, Clone)]
pub struct NewUploadLog {
    pub video_asset_id: Uuid,
    pub platform: String,
    pub post_url: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub status: String,
    pub is_published: bool,
}

const LOG_COLUMNS: &str = "id, video_asset_id, platform, post_url, scheduled_at, \
     published_at, next_retry_at, status, is_published, created_at";

// ---------------------------------------------------------------------------
// upload_logs operations
// ---------------------------------------------------------------------------

/// Appends one publish-attempt row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_upload_log(
    pool: &PgPool,
    log: &NewUploadLog,
) -> Result<UploadLogRow, DbError> {
    let new_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, UploadLogRow>(&format!(
        "INSERT INTO upload_logs \
             (id, video_asset_id, platform, post_url, scheduled_at, published_at, \
              next_retry_at, status, is_published) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {LOG_COLUMNS}"
    ))
    .bind(new_id)
    .bind(log.video_asset_id)
    .bind(&log.platform)
    .bind(&log.post_url)
    .bind(log.scheduled_at)
    .bind(log.published_at)
    .bind(log.next_retry_at)
    .bind(&log.status)
    .bind(log.is_published)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent attempt for an asset, if any.
///
/// Ordered by `created_at DESC, id DESC` so ties on timestamp still yield
/// the latest insert. This row alone drives the retry gate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_log_for_asset(
    pool: &PgPool,
    video_asset_id: Uuid,
) -> Result<Option<UploadLogRow>, DbError> {
    let row = sqlx::query_as::<_, UploadLogRow>(&format!(
        "SELECT {LOG_COLUMNS} \
         FROM upload_logs \
         WHERE video_asset_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1"
    ))
    .bind(video_asset_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Counts `SUCCESS` attempts for a channel's assets since `cutoff`.
///
/// The cutoff is computed by the caller (`now - 24h`) so the quota window is
/// a sliding window, not a calendar day, and so tests can pin `now`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_recent_successes(
    pool: &PgPool,
    channel_id: Uuid,
    cutoff: DateTime<Utc>,
) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) \
         FROM upload_logs ul \
         JOIN video_assets va ON va.id = ul.video_asset_id \
         WHERE va.channel_id = $1 \
           AND ul.status = 'SUCCESS' \
           AND ul.created_at >= $2",
    )
    .bind(channel_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
