//! Offline unit tests for clipcart-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::Utc;
use clipcart_core::{AppConfig, Environment};
use clipcart_db::{ChannelRow, PoolConfig, ProductRow, UploadLogRow, VideoAssetRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        channels_path: PathBuf::from("./config/channels.yaml"),
        storage_root: PathBuf::from("./storage"),
        raw_dir: PathBuf::from("./storage/raw"),
        processed_dir: PathBuf::from("./storage/processed"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        fetch_timeout_secs: 20,
        download_timeout_secs: 30,
        user_agent: "ua".to_string(),
        max_concurrent_items: 1,
        max_retries: 3,
        retry_backoff_base_secs: 5,
        fallback_pool: vec![],
        default_channel_id: None,
        translate_endpoint: None,
        publish_endpoint: None,
        publish_token: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ProductRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn product_row_has_expected_fields() {
    let row = ProductRow {
        id: Uuid::new_v4(),
        title: "Mini Blender".to_string(),
        category: None,
        origin_url: "https://site/x".to_string(),
        origin_site: Some("aliexpress".to_string()),
        affiliate_url: Some("PENDING".to_string()),
        status: "READY_TO_DOWNLOAD".to_string(),
        track: "AUTO".to_string(),
        collected_date: "20260720".to_string(),
        price_info: None,
        tags: None,
        error_message: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.title, "Mini Blender");
    assert_eq!(row.origin_url, "https://site/x");
    assert_eq!(row.status, "READY_TO_DOWNLOAD");
    assert_eq!(row.track, "AUTO");
    assert!(row.error_message.is_none());
}

/// Compile-time smoke test for [`ChannelRow`].
#[test]
fn channel_row_has_expected_fields() {
    let row = ChannelRow {
        id: Uuid::new_v4(),
        channel_name: "Gadget Shorts".to_string(),
        platform: "youtube".to_string(),
        upload_mode: "api".to_string(),
        daily_upload_limit: 3,
        subtitle_style: "BOTH".to_string(),
        tone: "INFORMAL".to_string(),
        hashtag_template: Some("#shorts {title}".to_string()),
        title_prefix: Some("[Deal]".to_string()),
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.daily_upload_limit, 3);
    assert!(row.active);
    assert_eq!(row.subtitle_style, "BOTH");
}

/// Compile-time smoke test for [`VideoAssetRow`] and [`UploadLogRow`].
#[test]
fn asset_and_log_rows_have_expected_fields() {
    let asset_id = Uuid::new_v4();

    let asset = VideoAssetRow {
        id: asset_id,
        product_id: Uuid::new_v4(),
        affiliate_link_id: None,
        channel_id: Some(Uuid::new_v4()),
        source_url: "https://cdn/a.mp4".to_string(),
        raw_path: Some("/storage/raw/Mini_Blender.mp4".to_string()),
        processed_path: Some("/storage/processed/Mini_Blender_final.mp4".to_string()),
        thumbnail_path: None,
        status: "PROCESSED".to_string(),
        error_message: None,
        language: None,
        duration_sec: Some(34),
        hashtags: Some(vec!["#shorts".to_string()]),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let log = UploadLogRow {
        id: Uuid::new_v4(),
        video_asset_id: asset_id,
        platform: "youtube".to_string(),
        post_url: Some("https://www.youtube.com/watch?v=abc123".to_string()),
        scheduled_at: None,
        published_at: Some(Utc::now()),
        next_retry_at: None,
        status: "SUCCESS".to_string(),
        is_published: true,
        created_at: Utc::now(),
    };

    assert_eq!(log.video_asset_id, asset.id);
    assert!(log.is_published);
    assert_eq!(asset.status, "PROCESSED");
    assert!(asset.processed_path.is_some());
}
