//! Acquisition and render stages of the video pipeline.
//!
//! Both stages are batch passes coordinated purely through the persistent
//! store: acquisition moves products from `READY_TO_DOWNLOAD` /
//! `PRIORITY_DOWNLOAD` to `DOWNLOADED` (or `ERROR`) and records the raw
//! file; render moves `DOWNLOADED` products to `PROCESSED` and records the
//! publish-ready artifact. External tools (`ffmpeg`, `ffprobe`) and the
//! encoder are collaborators behind narrow boundaries.

pub mod acquire;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod paths;
pub mod render;
mod retry;
pub mod tools;

pub use acquire::{run_download_pass, DownloadOutcome};
pub use error::{MediaError, PassError};
pub use fallback::FallbackPool;
pub use fetch::MediaFetcher;
pub use paths::{
    build_filename, build_output_name, ensure_storage_dirs, resolve_target_path, sanitize_title,
};
pub use render::{
    build_overlay_plan, run_render_pass, FfmpegEncoder, OverlayPlan, RenderOutcome, VideoEncoder,
};
pub use tools::{
    is_segmented_url, probe_duration_secs, probe_has_video, remux_stream_copy,
    validate_media_file,
};
