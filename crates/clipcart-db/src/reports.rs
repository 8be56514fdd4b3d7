//! Per-status counts surfaced by the `report` command and the status API.

use sqlx::PgPool;

use crate::DbError;

/// One `(status, count)` pair.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Counts per status across the three pipeline tables.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub products: Vec<StatusCount>,
    pub video_assets: Vec<StatusCount>,
    pub upload_logs: Vec<StatusCount>,
}

/// Builds the full status report in three grouped count queries.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn status_report(pool: &PgPool) -> Result<StatusReport, DbError> {
    let products = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM products GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let video_assets = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM video_assets GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let upload_logs = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM upload_logs GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    Ok(StatusReport {
        products,
        video_assets,
        upload_logs,
    })
}
