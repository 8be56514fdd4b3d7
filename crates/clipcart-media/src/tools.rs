//! External transcoder/probe collaborators (`ffmpeg`, `ffprobe`).

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::MediaError;

/// A download below this size is junk regardless of what probing says.
const MIN_VALID_BYTES: u64 = 1024;

/// Returns `true` for segmented/streaming formats that need a stream-copy
/// remux instead of a byte download. Matched on the URL path extension, not
/// a substring, so `report.tsv` does not count as a transport stream.
#[must_use]
pub fn is_segmented_url(url: &str) -> bool {
    let path_end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..path_end];
    matches!(
        path.rsplit('.').next(),
        Some("m3u8" | "ts" | "flv") if path.contains('.')
    )
}

/// Remuxes a segmented stream into an mp4 container without re-encoding.
///
/// # Errors
///
/// - [`MediaError::ToolMissing`] when `ffmpeg` is not on PATH.
/// - [`MediaError::ToolFailed`] when the remux exits non-zero or produces
///   no output file; the stderr tail is carried in the error.
pub async fn remux_stream_copy(url: &str, target: &Path) -> Result<(), MediaError> {
    which::which("ffmpeg").map_err(|_| MediaError::ToolMissing { tool: "ffmpeg" })?;

    let output = Command::new("ffmpeg")
        .args(["-y", "-i", url, "-c", "copy"])
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() || !target.exists() {
        let _ = tokio::fs::remove_file(target).await;
        return Err(MediaError::ToolFailed {
            tool: "ffmpeg",
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Asks `ffprobe` whether the file has a video stream.
///
/// # Errors
///
/// - [`MediaError::ToolMissing`] when `ffprobe` is not on PATH.
/// - [`MediaError::Io`] when the probe process cannot be spawned.
pub async fn probe_has_video(path: &Path) -> Result<bool, MediaError> {
    which::which("ffprobe").map_err(|_| MediaError::ToolMissing { tool: "ffprobe" })?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=codec_type",
            "-of",
            "default=nw=1",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Ok(false);
    }
    Ok(String::from_utf8_lossy(&output.stdout).contains("codec_type=video"))
}

/// Reads the container duration in whole seconds, or `None` when the probe
/// cannot say.
///
/// # Errors
///
/// - [`MediaError::ToolMissing`] when `ffprobe` is not on PATH.
/// - [`MediaError::Io`] when the probe process cannot be spawned.
pub async fn probe_duration_secs(path: &Path) -> Result<Option<i32>, MediaError> {
    which::which("ffprobe").map_err(|_| MediaError::ToolMissing { tool: "ffprobe" })?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Ok(None);
    }
    let seconds = String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse::<f64>()
        .ok();
    #[allow(clippy::cast_possible_truncation)]
    let rounded = seconds.map(|s| s.round() as i32);
    Ok(rounded)
}

/// Full artifact validation: a plausible size plus a video stream.
///
/// # Errors
///
/// Returns [`MediaError::ValidationFailed`] when the file is missing, too
/// small, or has no video stream; probe-tool errors propagate as-is.
pub async fn validate_media_file(path: &Path) -> Result<(), MediaError> {
    let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
    if size < MIN_VALID_BYTES {
        return Err(MediaError::ValidationFailed {
            path: path.to_path_buf(),
            reason: format!("file too small ({size} bytes)"),
        });
    }
    if !probe_has_video(path).await? {
        return Err(MediaError::ValidationFailed {
            path: path.to_path_buf(),
            reason: "no video stream".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segmented_urls_match_on_extension() {
        assert!(is_segmented_url("https://cdn/live.m3u8"));
        assert!(is_segmented_url("https://cdn/seg/000123.ts?auth=x"));
        assert!(is_segmented_url("https://cdn/room/stream.flv#frag"));
    }

    #[test]
    fn plain_and_lookalike_urls_are_not_segmented() {
        assert!(!is_segmented_url("https://cdn/clip.mp4"));
        assert!(!is_segmented_url("https://cdn/report.tsv"));
        assert!(!is_segmented_url("https://cdn/data.m3u8json"));
        assert!(!is_segmented_url("https://cdn/no-extension"));
    }

    #[test]
    fn query_string_does_not_confuse_extension_matching() {
        assert!(!is_segmented_url("https://cdn/clip.mp4?fmt=m3u8"));
        assert!(is_segmented_url("https://cdn/clip.m3u8?fmt=mp4"));
    }
}
