//! Lifecycle enums for products, video assets, and upload attempts.
//!
//! The database stores every status column as TEXT so new values can be
//! introduced without data loss; these enums cover the values the pipeline
//! itself reads and writes. Conversions happen at the edges — row types keep
//! the raw string.

use std::str::FromStr;

use crate::CoreError;

/// Coarse product lifecycle driven by the acquisition and render stages.
///
/// `READY_TO_DOWNLOAD`/`PRIORITY_DOWNLOAD` → `DOWNLOADED` → `PROCESSED` →
/// `UPLOADED`, with `ERROR` reachable from (and re-enterable by) any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    ReadyToDownload,
    PriorityDownload,
    Downloaded,
    Processed,
    Uploaded,
    Error,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProductStatus::ReadyToDownload => "READY_TO_DOWNLOAD",
            ProductStatus::PriorityDownload => "PRIORITY_DOWNLOAD",
            ProductStatus::Downloaded => "DOWNLOADED",
            ProductStatus::Processed => "PROCESSED",
            ProductStatus::Uploaded => "UPLOADED",
            ProductStatus::Error => "ERROR",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY_TO_DOWNLOAD" => Ok(ProductStatus::ReadyToDownload),
            "PRIORITY_DOWNLOAD" => Ok(ProductStatus::PriorityDownload),
            "DOWNLOADED" => Ok(ProductStatus::Downloaded),
            "PROCESSED" => Ok(ProductStatus::Processed),
            "UPLOADED" => Ok(ProductStatus::Uploaded),
            "ERROR" => Ok(ProductStatus::Error),
            other => Err(CoreError::InvalidProductStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained video asset lifecycle.
///
/// Mirrors the product lifecycle but tracks the asset through editing and
/// post-upload completion: `COLLECTING → COLLECTED → EDITING → READY →
/// PROCESSED → UPLOADED → COMPLETED`, `ERROR` reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Collecting,
    Collected,
    Editing,
    Ready,
    Processed,
    Uploaded,
    Completed,
    Error,
}

impl PipelineStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Collecting => "COLLECTING",
            PipelineStatus::Collected => "COLLECTED",
            PipelineStatus::Editing => "EDITING",
            PipelineStatus::Ready => "READY",
            PipelineStatus::Processed => "PROCESSED",
            PipelineStatus::Uploaded => "UPLOADED",
            PipelineStatus::Completed => "COMPLETED",
            PipelineStatus::Error => "ERROR",
        }
    }
}

impl FromStr for PipelineStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COLLECTING" => Ok(PipelineStatus::Collecting),
            "COLLECTED" => Ok(PipelineStatus::Collected),
            "EDITING" => Ok(PipelineStatus::Editing),
            "READY" => Ok(PipelineStatus::Ready),
            "PROCESSED" => Ok(PipelineStatus::Processed),
            "UPLOADED" => Ok(PipelineStatus::Uploaded),
            "COMPLETED" => Ok(PipelineStatus::Completed),
            "ERROR" => Ok(PipelineStatus::Error),
            other => Err(CoreError::InvalidPipelineStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Success,
    Failed,
}

impl UploadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Pending => "PENDING",
            UploadStatus::Success => "SUCCESS",
            UploadStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for UploadStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(UploadStatus::Pending),
            "SUCCESS" => Ok(UploadStatus::Success),
            "FAILED" => Ok(UploadStatus::Failed),
            other => Err(CoreError::InvalidUploadStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection track. `MANUAL` items are prioritised ahead of `AUTO` items
/// when a stage orders its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Auto,
    Manual,
}

impl Track {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Track::Auto => "AUTO",
            Track::Manual => "MANUAL",
        }
    }
}

impl FromStr for Track {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO" => Ok(Track::Auto),
            "MANUAL" => Ok(Track::Manual),
            other => Err(CoreError::InvalidTrack(other.to_string())),
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where caption overlays are drawn on a rendered video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleStyle {
    Top,
    Bottom,
    Both,
}

impl SubtitleStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SubtitleStyle::Top => "TOP",
            SubtitleStyle::Bottom => "BOTTOM",
            SubtitleStyle::Both => "BOTH",
        }
    }

    /// Parse a channel's stored style, defaulting to `BOTH` for unknown or
    /// missing values rather than failing the render pass.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or(SubtitleStyle::Both)
    }
}

impl FromStr for SubtitleStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TOP" => Ok(SubtitleStyle::Top),
            "BOTTOM" => Ok(SubtitleStyle::Bottom),
            "BOTH" => Ok(SubtitleStyle::Both),
            other => Err(CoreError::InvalidSubtitleStyle(other.to_string())),
        }
    }
}

impl std::fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice of the call-to-action caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Informal,
    Formal,
    Sales,
}

impl Tone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tone::Informal => "INFORMAL",
            Tone::Formal => "FORMAL",
            Tone::Sales => "SALES",
        }
    }

    /// Parse a channel's stored tone, defaulting to `INFORMAL` for unknown
    /// or missing values.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Tone::Informal)
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFORMAL" => Ok(Tone::Informal),
            "FORMAL" => Ok(Tone::Formal),
            "SALES" => Ok(Tone::Sales),
            other => Err(CoreError::InvalidTone(other.to_string())),
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_status_roundtrips() {
        for status in [
            ProductStatus::ReadyToDownload,
            ProductStatus::PriorityDownload,
            ProductStatus::Downloaded,
            ProductStatus::Processed,
            ProductStatus::Uploaded,
            ProductStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
    }

    #[test]
    fn pipeline_status_roundtrips() {
        for status in [
            PipelineStatus::Collecting,
            PipelineStatus::Collected,
            PipelineStatus::Editing,
            PipelineStatus::Ready,
            PipelineStatus::Processed,
            PipelineStatus::Uploaded,
            PipelineStatus::Completed,
            PipelineStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<PipelineStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_product_status_is_an_error() {
        let result = "ARCHIVED".parse::<ProductStatus>();
        assert!(matches!(
            result,
            Err(CoreError::InvalidProductStatus(ref s)) if s == "ARCHIVED"
        ));
    }

    #[test]
    fn subtitle_style_parses_case_insensitively() {
        assert_eq!(
            "bottom".parse::<SubtitleStyle>().unwrap(),
            SubtitleStyle::Bottom
        );
    }

    #[test]
    fn subtitle_style_defaults_to_both_on_unknown() {
        assert_eq!(
            SubtitleStyle::parse_or_default("SIDEWAYS"),
            SubtitleStyle::Both
        );
    }

    #[test]
    fn tone_defaults_to_informal_on_unknown() {
        assert_eq!(Tone::parse_or_default("SHOUTY"), Tone::Informal);
    }

    #[test]
    fn upload_status_display_matches_stored_text() {
        assert_eq!(UploadStatus::Success.to_string(), "SUCCESS");
        assert_eq!(UploadStatus::Failed.to_string(), "FAILED");
    }
}
