//! Database operations for `products`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// `status` and `track` are open-set TEXT columns; known values are modeled
/// by `clipcart_core::ProductStatus` / `clipcart_core::Track` but unknown
/// values survive in the row untouched.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub origin_url: String,
    pub origin_site: Option<String>,
    pub affiliate_url: Option<String>,
    pub status: String,
    pub track: String,
    /// Collection date as `YYYYMMDD`; defaults to `"19700101"`.
    pub collected_date: String,
    pub price_info: Option<String>,
    pub tags: Option<Vec<String>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_COLUMNS: &str = "id, title, category, origin_url, origin_site, affiliate_url, \
     status, track, collected_date, price_info, tags, error_message, created_at, updated_at";

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Inserts a product if no row exists for its `origin_url`.
///
/// Returns `(row, true)` when a new row was created, `(row, false)` when the
/// URL was already collected — the existing row is returned untouched, so
/// repeated collection of the same listing is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn insert_product_if_absent(
    pool: &PgPool,
    product: &clipcart_core::CollectedProduct,
) -> Result<(ProductRow, bool), DbError> {
    let id = Uuid::new_v4();

    let inserted = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (id, title, category, origin_url, origin_site, affiliate_url, \
              status, track, collected_date, price_info, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (origin_url) DO NOTHING \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&product.title)
    .bind(&product.category)
    .bind(&product.origin_url)
    .bind(&product.origin_site)
    .bind(&product.affiliate_url)
    .bind(&product.status)
    .bind(&product.track)
    .bind(&product.collected_date)
    .bind(&product.price_info)
    .bind(&product.tags)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = inserted {
        return Ok((row, true));
    }

    let existing = get_product_by_origin_url(pool, &product.origin_url)
        .await?
        .ok_or(DbError::NotFound)?;
    Ok((existing, false))
}

/// Upserts a product row, updating all scraped fields in place on
/// `origin_url` conflict.
///
/// Returns the full row after the write.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(
    pool: &PgPool,
    product: &clipcart_core::CollectedProduct,
) -> Result<ProductRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (id, title, category, origin_url, origin_site, affiliate_url, \
              status, track, collected_date, price_info, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (origin_url) DO UPDATE SET \
             title          = EXCLUDED.title, \
             category       = EXCLUDED.category, \
             origin_site    = EXCLUDED.origin_site, \
             affiliate_url  = EXCLUDED.affiliate_url, \
             status         = EXCLUDED.status, \
             track          = EXCLUDED.track, \
             collected_date = EXCLUDED.collected_date, \
             price_info     = EXCLUDED.price_info, \
             tags           = EXCLUDED.tags, \
             updated_at     = NOW() \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&product.title)
    .bind(&product.category)
    .bind(&product.origin_url)
    .bind(&product.origin_site)
    .bind(&product.affiliate_url)
    .bind(&product.status)
    .bind(&product.track)
    .bind(&product.collected_date)
    .bind(&product.price_info)
    .bind(&product.tags)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetches a product by `id`, if one exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetches a product by its unique `origin_url`, if one exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_origin_url(
    pool: &PgPool,
    origin_url: &str,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE origin_url = $1"
    ))
    .bind(origin_url)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Sets a product's status and error message.
///
/// `error_message` is written as given — pass `None` to clear a previous
/// failure when the product re-enters a healthy state.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_product_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE products \
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

/// Lists products awaiting acquisition: `PRIORITY_DOWNLOAD` rows first, then
/// `READY_TO_DOWNLOAD`, oldest first within each group.
///
/// `track` filters to a single collection track; `limit` bounds the batch
/// (`None` means no cap — Postgres treats `LIMIT NULL` as `LIMIT ALL`).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products_for_download(
    pool: &PgPool,
    track: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} \
         FROM products \
         WHERE status IN ('PRIORITY_DOWNLOAD', 'READY_TO_DOWNLOAD') \
           AND ($1::text IS NULL OR track = $1) \
         ORDER BY CASE WHEN status = 'PRIORITY_DOWNLOAD' THEN 0 ELSE 1 END, \
                  created_at ASC, id ASC \
         LIMIT $2"
    ))
    .bind(track)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Lists products awaiting render: `DOWNLOADED` rows, plus `ERROR` rows that
/// still have a raw file recorded on an asset (a failed render can be
/// retried; a failed download cannot). `MANUAL` track sorts ahead of `AUTO`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products_for_render(
    pool: &PgPool,
    track: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} \
         FROM products p \
         WHERE (p.status = 'DOWNLOADED' \
                OR (p.status = 'ERROR' AND EXISTS ( \
                    SELECT 1 FROM video_assets va \
                    WHERE va.product_id = p.id AND va.raw_path IS NOT NULL))) \
           AND ($1::text IS NULL OR p.track = $1) \
         ORDER BY CASE WHEN p.track = 'MANUAL' THEN 0 ELSE 1 END, \
                  p.created_at ASC, p.id ASC \
         LIMIT $2"
    ))
    .bind(track)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
