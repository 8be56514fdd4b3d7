//! Upload scheduling and publishing.
//!
//! The scheduler reads quota and retry state fresh from the store on every
//! pass; the publisher is a collaborator behind [`Publisher`] whose typed
//! errors drive the backoff policy. Failures are data: every attempt leaves
//! an append-only log row.

pub mod backoff;
pub mod error;
pub mod http_publisher;
pub mod publisher;
pub mod scheduler;

pub use backoff::{next_retry_at, retry_delay};
pub use error::UploadError;
pub use http_publisher::HttpPublisher;
pub use publisher::{PublishError, PublishErrorKind, PublishRequest, Publisher};
pub use scheduler::{
    remaining_quota, retry_gate_allows, run_upload_pass, UploadOutcome,
};
