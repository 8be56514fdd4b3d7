//! Render stage: turn an acquired raw file into a publish-ready artifact.
//!
//! The stage owns building the overlay plan from the channel's presentation
//! rules; the actual encoding is an external collaborator behind
//! [`VideoEncoder`]. Encoder failures mark the product `ERROR` and are
//! retried by re-running the pass, never inside it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use sqlx::PgPool;
use tokio::process::Command;
use uuid::Uuid;

use clipcart_core::presentation::{
    apply_subtitle_style, build_title, clean_text, cta_for_tone, render_hashtags,
};
use clipcart_core::{AppConfig, PipelineStatus, ProductStatus, SubtitleStyle, Tone};
use clipcart_db::{ChannelRow, NewVideoAsset};

use crate::error::{MediaError, PassError};
use crate::paths::{build_output_name, ensure_storage_dirs, resolve_target_path};
use crate::tools::probe_duration_secs;

/// Caption set handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPlan {
    /// Product title (with channel prefix), drawn near the top edge.
    pub top_text: String,
    /// Call-to-action plus rendered hashtags, drawn near the bottom edge.
    pub bottom_text: String,
    /// Centered closing caption shown over the final moments.
    pub outro_text: String,
}

/// External encoding collaborator.
pub trait VideoEncoder {
    fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &OverlayPlan,
    ) -> impl std::future::Future<Output = Result<(), MediaError>> + Send;
}

/// Builds the overlay plan from a product title and the assigned channel's
/// presentation rules. A missing channel renders with defaults (no prefix,
/// informal tone, captions on both edges).
#[must_use]
pub fn build_overlay_plan(title: &str, channel: Option<&ChannelRow>) -> OverlayPlan {
    let prefix = channel.and_then(|c| c.title_prefix.as_deref());
    let full_title = build_title(prefix, title);

    let tone = channel.map_or(Tone::Informal, |c| Tone::parse_or_default(&c.tone));
    let mut bottom_text = cta_for_tone(tone).to_string();
    if let Some(template) = channel.and_then(|c| c.hashtag_template.as_deref()) {
        let rendered = render_hashtags(template, &full_title);
        if !rendered.is_empty() {
            bottom_text = format!("{bottom_text}\n{rendered}");
        }
    }

    let style = channel.map_or(SubtitleStyle::Both, |c| {
        SubtitleStyle::parse_or_default(&c.subtitle_style)
    });
    let (top_text, bottom_text) = apply_subtitle_style(style, full_title, bottom_text);

    OverlayPlan {
        top_text,
        bottom_text,
        outro_text: "Shop link in the comments!".to_string(),
    }
}

/// Splits a channel's rendered hashtag template into stored tags, keeping
/// only `#`-prefixed tokens.
#[must_use]
pub fn hashtags_from_template(template: Option<&str>, title: &str) -> Option<Vec<String>> {
    let template = template?;
    let rendered = render_hashtags(template, title);
    let tags: Vec<String> = rendered
        .split_whitespace()
        .filter(|token| token.starts_with('#') && token.len() > 1)
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Escape text for use inside an ffmpeg `drawtext` argument.
#[must_use]
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Default encoder: shells out to `ffmpeg`, scaling and padding to a 720x1280
/// portrait canvas and drawing the overlay captions.
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    fn drawtext_filter(text: &str, font_size: u32, y_expr: &str, box_color: &str) -> String {
        format!(
            "drawtext=text='{}':fontcolor=white:fontsize={font_size}:box=1:\
             boxcolor={box_color}:boxborderw=12:x=(w-text_w)/2:y={y_expr}:line_spacing=6",
            escape_drawtext(text)
        )
    }

    fn build_video_filter(plan: &OverlayPlan, duration_secs: f64) -> String {
        let mut filters = vec![
            "scale=720:1280:force_original_aspect_ratio=decrease,\
             pad=720:1280:(ow-iw)/2:(oh-ih)/2"
                .to_string(),
        ];
        if !plan.top_text.trim().is_empty() {
            filters.push(Self::drawtext_filter(&plan.top_text, 48, "40", "black@0.55"));
        }
        if !plan.bottom_text.trim().is_empty() {
            filters.push(Self::drawtext_filter(
                &plan.bottom_text,
                52,
                "h-210",
                "orange@0.45",
            ));
        }
        if !plan.outro_text.trim().is_empty() {
            let outro_start = (duration_secs - 1.5).max(0.0);
            let outro = format!(
                "{}:enable='gte(t\\,{outro_start:.2})'",
                Self::drawtext_filter(&plan.outro_text, 64, "(h-text_h)/2", "black@0.6")
            );
            filters.push(outro);
        }
        filters.join(",")
    }
}

impl VideoEncoder for FfmpegEncoder {
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &OverlayPlan,
    ) -> Result<(), MediaError> {
        which::which("ffmpeg").map_err(|_| MediaError::ToolMissing { tool: "ffmpeg" })?;

        let duration = probe_duration_secs(input)
            .await
            .ok()
            .flatten()
            .unwrap_or(0);
        let video_filter = Self::build_video_filter(plan, f64::from(duration));

        let result = Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(input)
            .args(["-vf", &video_filter])
            .args(["-c:v", "libx264", "-preset", "ultrafast", "-c:a", "aac"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() || !output.exists() {
            let _ = tokio::fs::remove_file(output).await;
            return Err(MediaError::ToolFailed {
                tool: "ffmpeg",
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Per-product result of one render pass.
#[derive(Debug)]
pub struct RenderOutcome {
    pub product_id: Uuid,
    pub origin_url: String,
    pub processed_path: Option<PathBuf>,
    pub success: bool,
    pub message: String,
}

/// Runs one render pass over downloaded (and render-errored) products.
///
/// Products are encoded with bounded concurrency
/// (`max_concurrent_items`); the store is the only shared state, so
/// concurrent items never contend on anything else. Per-product failures
/// set the product to `ERROR` and continue.
///
/// # Errors
///
/// Returns [`PassError`] when the work list cannot be loaded, a status
/// write fails, or the storage directories cannot be created.
pub async fn run_render_pass<E: VideoEncoder>(
    pool: &PgPool,
    config: &AppConfig,
    encoder: &E,
    limit: Option<i64>,
    track: Option<&str>,
) -> Result<Vec<RenderOutcome>, PassError> {
    use futures::stream::{self, StreamExt};

    ensure_storage_dirs(&config.raw_dir, &config.processed_dir)?;

    let products = clipcart_db::list_products_for_render(pool, track, limit).await?;
    if products.is_empty() {
        tracing::info!("no products awaiting render");
        return Ok(Vec::new());
    }

    let max_concurrent = config.max_concurrent_items.max(1);

    let tasks: Vec<_> = products
        .iter()
        .map(|product| render_product(pool, config, encoder, product))
        .collect();
    let results: Vec<Result<RenderOutcome, PassError>> = stream::iter(tasks)
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    results.into_iter().collect()
}

async fn render_product<E: VideoEncoder>(
    pool: &PgPool,
    config: &AppConfig,
    encoder: &E,
    product: &clipcart_db::ProductRow,
) -> Result<RenderOutcome, PassError> {
    let fail = |message: String| RenderOutcome {
        product_id: product.id,
        origin_url: product.origin_url.clone(),
        processed_path: None,
        success: false,
        message,
    };

    // The raw path is read from the recorded asset, never rediscovered by
    // scanning the raw directory.
    let Some(asset) = clipcart_db::latest_asset_for_product(pool, product.id).await? else {
        let message = "no video asset recorded".to_string();
        clipcart_db::update_product_status(
            pool,
            product.id,
            ProductStatus::Error.as_str(),
            Some(&message),
        )
        .await?;
        return Ok(fail(message));
    };
    let Some(raw_path) = asset.raw_path.clone().map(PathBuf::from) else {
        let message = "asset has no raw path".to_string();
        clipcart_db::update_product_status(
            pool,
            product.id,
            ProductStatus::Error.as_str(),
            Some(&message),
        )
        .await?;
        return Ok(fail(message));
    };
    if !raw_path.exists() {
        let message = MediaError::RawFileMissing {
            path: raw_path.clone(),
        }
        .to_string();
        clipcart_db::update_product_status(
            pool,
            product.id,
            ProductStatus::Error.as_str(),
            Some(&message),
        )
        .await?;
        return Ok(fail(message));
    }

    let channel_id = asset.channel_id.or(config.default_channel_id);
    let channel = match channel_id {
        Some(id) => clipcart_db::get_channel(pool, id).await?,
        None => None,
    };

    let title = clean_text(&product.title);
    let plan = build_overlay_plan(&title, channel.as_ref());
    let output = resolve_target_path(&config.processed_dir, &build_output_name(&title));

    match encoder.encode(&raw_path, &output, &plan).await {
        Ok(()) => {
            let duration_sec = probe_duration_secs(&output).await.ok().flatten();
            let hashtag_template = channel.as_ref().and_then(|c| c.hashtag_template.as_deref());

            clipcart_db::update_product_status(
                pool,
                product.id,
                ProductStatus::Processed.as_str(),
                None,
            )
            .await?;
            clipcart_db::upsert_video_asset(
                pool,
                &NewVideoAsset {
                    product_id: product.id,
                    affiliate_link_id: asset.affiliate_link_id,
                    channel_id,
                    source_url: asset.source_url.clone(),
                    raw_path: asset.raw_path.clone(),
                    processed_path: Some(output.display().to_string()),
                    thumbnail_path: asset.thumbnail_path.clone(),
                    status: PipelineStatus::Processed.as_str().to_string(),
                    error_message: None,
                    language: asset.language.clone(),
                    duration_sec,
                    hashtags: hashtags_from_template(hashtag_template, &title),
                },
            )
            .await?;

            Ok(RenderOutcome {
                product_id: product.id,
                origin_url: product.origin_url.clone(),
                processed_path: Some(output),
                success: true,
                message: "processed".to_string(),
            })
        }
        Err(e) => {
            tracing::warn!(
                origin_url = %product.origin_url,
                error = %e,
                "render failed"
            );
            let message = e.to_string();
            clipcart_db::update_product_status(
                pool,
                product.id,
                ProductStatus::Error.as_str(),
                Some(&message),
            )
            .await?;
            Ok(fail(message))
        }
    }
}
