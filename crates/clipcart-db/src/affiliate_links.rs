//! Database operations for `affiliate_links`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `affiliate_links` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AffiliateLinkRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub affiliate_url: String,
    pub network: Option<String>,
    pub campaign_code: Option<String>,
    pub short_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upserts an affiliate link.
///
/// Conflicts on `affiliate_url` re-point the link at the given product and
/// refresh its metadata. Returns the full row after the write.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_affiliate_link(
    pool: &PgPool,
    product_id: Uuid,
    affiliate_url: &str,
    network: Option<&str>,
    campaign_code: Option<&str>,
    short_url: Option<&str>,
    is_active: bool,
) -> Result<AffiliateLinkRow, DbError> {
    let new_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, AffiliateLinkRow>(
        "INSERT INTO affiliate_links \
             (id, product_id, affiliate_url, network, campaign_code, short_url, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (affiliate_url) DO UPDATE SET \
             product_id    = EXCLUDED.product_id, \
             network       = EXCLUDED.network, \
             campaign_code = EXCLUDED.campaign_code, \
             short_url     = EXCLUDED.short_url, \
             is_active     = EXCLUDED.is_active, \
             updated_at    = NOW() \
         RETURNING id, product_id, affiliate_url, network, campaign_code, short_url, \
                   is_active, created_at, updated_at",
    )
    .bind(new_id)
    .bind(product_id)
    .bind(affiliate_url)
    .bind(network)
    .bind(campaign_code)
    .bind(short_url)
    .bind(is_active)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
