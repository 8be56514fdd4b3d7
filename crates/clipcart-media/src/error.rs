use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("required tool not found on PATH: {tool}")]
    ToolMissing { tool: &'static str },

    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },

    #[error("downloaded file failed validation ({reason}): {path}")]
    ValidationFailed { path: PathBuf, reason: String },

    #[error("no usable video source for {origin_url}")]
    NoUsableSource { origin_url: String },

    #[error("raw file missing for render: {path}")]
    RawFileMissing { path: PathBuf },
}

/// Errors that abort an entire stage pass (as opposed to one item's
/// failure, which is recorded on the item and does not stop the batch).
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Db(#[from] clipcart_db::DbError),

    #[error("storage directory setup failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("stage setup failed: {0}")]
    Setup(#[from] MediaError),
}
