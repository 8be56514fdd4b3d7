pub mod app_config;
pub mod channels;
pub mod config;
pub mod presentation;
pub mod products;
pub mod status;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use channels::{load_channels, ChannelSeed, ChannelsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::CollectedProduct;
pub use status::{PipelineStatus, ProductStatus, SubtitleStyle, Tone, Track, UploadStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read channels file {path}: {source}")]
    ChannelsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse channels file: {0}")]
    ChannelsFileParse(#[from] serde_yaml::Error),
    #[error("channels file validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid product status: {0}")]
    InvalidProductStatus(String),
    #[error("invalid pipeline status: {0}")]
    InvalidPipelineStatus(String),
    #[error("invalid upload status: {0}")]
    InvalidUploadStatus(String),
    #[error("invalid track: {0}")]
    InvalidTrack(String),
    #[error("invalid subtitle style: {0}")]
    InvalidSubtitleStyle(String),
    #[error("invalid tone: {0}")]
    InvalidTone(String),
}
