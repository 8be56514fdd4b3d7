//! Acquisition stage: turn resolved candidates into a validated local file.
//!
//! Candidates are tried in resolver order — the order is a priority hint,
//! not a guarantee, so every candidate gets its chance before the fallback
//! pool is consulted. Exactly one file exists per successful acquisition;
//! partial downloads are removed before the next candidate runs.

use std::path::PathBuf;

use sqlx::PgPool;
use uuid::Uuid;

use clipcart_core::{AppConfig, PipelineStatus, ProductStatus};
use clipcart_db::{NewVideoAsset, ProductRow};
use clipcart_resolver::{
    resolve_candidates, PageInspector, SocialSearchClient, Translator,
};

use crate::error::{MediaError, PassError};
use crate::fallback::FallbackPool;
use crate::fetch::MediaFetcher;
use crate::paths::{build_filename, ensure_storage_dirs, resolve_target_path};
use crate::tools::{is_segmented_url, remux_stream_copy, validate_media_file};

/// Per-product result of one download pass.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub product_id: Uuid,
    pub origin_url: String,
    pub raw_path: Option<PathBuf>,
    pub success: bool,
    pub message: String,
}

/// Runs one acquisition pass over products awaiting download.
///
/// Per-product failures set the product to `ERROR` and continue; only
/// database failures and storage setup abort the pass.
///
/// # Errors
///
/// Returns [`PassError`] when the work list cannot be loaded, a status
/// write fails, or the storage directories cannot be created.
pub async fn run_download_pass<I, T>(
    pool: &PgPool,
    config: &AppConfig,
    inspector: &I,
    search: &SocialSearchClient,
    translator: &T,
    limit: Option<i64>,
    track: Option<&str>,
) -> Result<Vec<DownloadOutcome>, PassError>
where
    I: PageInspector,
    T: Translator,
{
    ensure_storage_dirs(&config.raw_dir, &config.processed_dir)?;

    let products = clipcart_db::list_products_for_download(pool, track, limit).await?;
    if products.is_empty() {
        tracing::info!("no products awaiting download");
        return Ok(Vec::new());
    }

    let fetcher = MediaFetcher::new(
        config.download_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let mut fallback = FallbackPool::from_paths(&config.fallback_pool);

    let mut outcomes = Vec::with_capacity(products.len());
    for product in &products {
        let candidates =
            resolve_candidates(inspector, search, translator, &product.origin_url, &product.title)
                .await;

        match acquire_product(&fetcher, &mut fallback, config, product, &candidates).await {
            Ok((raw_path, source_url)) => {
                clipcart_db::update_product_status(
                    pool,
                    product.id,
                    ProductStatus::Downloaded.as_str(),
                    None,
                )
                .await?;
                clipcart_db::upsert_video_asset(
                    pool,
                    &NewVideoAsset {
                        product_id: product.id,
                        source_url,
                        raw_path: Some(raw_path.display().to_string()),
                        status: PipelineStatus::Collected.as_str().to_string(),
                        ..NewVideoAsset::default()
                    },
                )
                .await?;

                outcomes.push(DownloadOutcome {
                    product_id: product.id,
                    origin_url: product.origin_url.clone(),
                    raw_path: Some(raw_path),
                    success: true,
                    message: "downloaded".to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    origin_url = %product.origin_url,
                    error = %e,
                    "acquisition failed"
                );
                clipcart_db::update_product_status(
                    pool,
                    product.id,
                    ProductStatus::Error.as_str(),
                    Some(&e.to_string()),
                )
                .await?;

                outcomes.push(DownloadOutcome {
                    product_id: product.id,
                    origin_url: product.origin_url.clone(),
                    raw_path: None,
                    success: false,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(outcomes)
}

/// Tries each candidate in order, then the fallback pool.
///
/// Returns the written path and the source URL that produced it (the
/// product's own origin URL for fallback-pool copies).
async fn acquire_product(
    fetcher: &MediaFetcher,
    fallback: &mut FallbackPool,
    config: &AppConfig,
    product: &ProductRow,
    candidates: &[String],
) -> Result<(PathBuf, String), MediaError> {
    let target = resolve_target_path(&config.raw_dir, &build_filename(&product.title));

    for candidate in candidates {
        let fetched = if is_segmented_url(candidate) {
            remux_stream_copy(candidate, &target).await
        } else {
            fetcher
                .download(candidate, &target, Some(&product.origin_url))
                .await
        };
        if let Err(e) = fetched {
            tracing::debug!(%candidate, error = %e, "candidate fetch failed");
            continue;
        }

        if let Err(e) = validate_media_file(&target).await {
            tracing::debug!(%candidate, error = %e, "candidate failed validation");
            let _ = tokio::fs::remove_file(&target).await;
            continue;
        }

        return Ok((target, candidate.clone()));
    }

    if fallback.copy_next(&target)? {
        tracing::info!(
            origin_url = %product.origin_url,
            target = %target.display(),
            "all candidates failed; used fallback pool"
        );
        return Ok((target, product.origin_url.clone()));
    }

    Err(MediaError::NoUsableSource {
        origin_url: product.origin_url.clone(),
    })
}
