use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::status::{SubtitleStyle, Tone};
use crate::ConfigError;

/// One publishing destination as declared in `config/channels.yaml`.
///
/// Seeded into the `channels` table by the `seed-channels` command; the row
/// is the runtime source of truth afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSeed {
    pub name: String,
    pub platform: String,
    #[serde(default = "default_upload_mode")]
    pub upload_mode: String,
    #[serde(default)]
    pub daily_upload_limit: i32,
    #[serde(default = "default_subtitle_style")]
    pub subtitle_style: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    pub title_prefix: Option<String>,
    pub hashtag_template: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_upload_mode() -> String {
    "api".to_string()
}

fn default_subtitle_style() -> String {
    SubtitleStyle::Both.as_str().to_string()
}

fn default_tone() -> String {
    Tone::Informal.as_str().to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ChannelsFile {
    pub channels: Vec<ChannelSeed>,
}

/// Load and validate the channels configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_channels(path: &Path) -> Result<ChannelsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChannelsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let channels_file: ChannelsFile = serde_yaml::from_str(&content)?;

    validate_channels(&channels_file)?;

    Ok(channels_file)
}

fn validate_channels(channels_file: &ChannelsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for channel in &channels_file.channels {
        if channel.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "channel name must be non-empty".to_string(),
            ));
        }
        if channel.platform.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "channel '{}' has an empty platform",
                channel.name
            )));
        }
        if channel.daily_upload_limit < 0 {
            return Err(ConfigError::Validation(format!(
                "channel '{}' has negative daily_upload_limit {}",
                channel.name, channel.daily_upload_limit
            )));
        }
        if SubtitleStyle::from_str(&channel.subtitle_style).is_err() {
            return Err(ConfigError::Validation(format!(
                "channel '{}' has unknown subtitle_style '{}'",
                channel.name, channel.subtitle_style
            )));
        }
        if Tone::from_str(&channel.tone).is_err() {
            return Err(ConfigError::Validation(format!(
                "channel '{}' has unknown tone '{}'",
                channel.name, channel.tone
            )));
        }

        let key = (
            channel.name.to_lowercase(),
            channel.platform.to_lowercase(),
        );
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate channel: '{}' on '{}'",
                channel.name, channel.platform
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<(), ConfigError> {
        let file: ChannelsFile = serde_yaml::from_str(yaml).expect("yaml parses");
        validate_channels(&file)
    }

    #[test]
    fn minimal_channel_gets_defaults() {
        let yaml = r"
channels:
  - name: Gadget Shorts
    platform: youtube
";
        let file: ChannelsFile = serde_yaml::from_str(yaml).unwrap();
        let channel = &file.channels[0];
        assert_eq!(channel.upload_mode, "api");
        assert_eq!(channel.daily_upload_limit, 0);
        assert_eq!(channel.subtitle_style, "BOTH");
        assert_eq!(channel.tone, "INFORMAL");
        assert!(channel.active);
        assert!(channel.title_prefix.is_none());
    }

    #[test]
    fn rejects_empty_name() {
        let yaml = r#"
channels:
  - name: "  "
    platform: youtube
"#;
        assert!(matches!(parse(yaml), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_negative_limit() {
        let yaml = r"
channels:
  - name: Gadget Shorts
    platform: youtube
    daily_upload_limit: -1
";
        assert!(matches!(parse(yaml), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_unknown_tone() {
        let yaml = r"
channels:
  - name: Gadget Shorts
    platform: youtube
    tone: SHOUTY
";
        assert!(matches!(parse(yaml), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_duplicate_name_platform_pair() {
        let yaml = r"
channels:
  - name: Gadget Shorts
    platform: youtube
  - name: gadget shorts
    platform: YouTube
";
        assert!(matches!(parse(yaml), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn accepts_distinct_platforms_for_same_name() {
        let yaml = r"
channels:
  - name: Gadget Shorts
    platform: youtube
  - name: Gadget Shorts
    platform: tiktok
";
        assert!(parse(yaml).is_ok());
    }
}
