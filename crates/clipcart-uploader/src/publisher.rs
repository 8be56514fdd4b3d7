//! Publisher boundary: one call that turns a rendered file into a live post.
//!
//! The error type carries an explicit kind so the scheduler's backoff policy
//! never has to parse prose. Publishers that only see transport message text
//! can fall back to [`PublishErrorKind::from_message`] at their own edge.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure classification driving the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// The platform's upload quota is exhausted; retry after the window rolls.
    Quota,
    /// Credentials are broken; retrying without operator action is useless.
    Auth,
    /// The platform already has this video; retrying reproduces the failure.
    Duplicate,
    /// Anything else — assumed transient.
    Unknown,
}

impl PublishErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PublishErrorKind::Quota => "quota",
            PublishErrorKind::Auth => "auth",
            PublishErrorKind::Duplicate => "duplicate",
            PublishErrorKind::Unknown => "unknown",
        }
    }

    /// Substring classification for opaque transport errors. Checked in
    /// quota → auth → duplicate order, mirroring how the platforms phrase
    /// their failures; anything unmatched is `Unknown`.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("quota") || message.contains("daily limit") {
            PublishErrorKind::Quota
        } else if message.contains("auth")
            || message.contains("unauthorized")
            || message.contains("invalid")
        {
            PublishErrorKind::Auth
        } else if message.contains("duplicate") {
            PublishErrorKind::Duplicate
        } else {
            PublishErrorKind::Unknown
        }
    }
}

/// Typed publish failure: a kind for the policy, a message for the log row.
#[derive(Debug, Error)]
#[error("{}: {message}", kind.as_str())]
pub struct PublishError {
    pub kind: PublishErrorKind,
    pub message: String,
}

impl PublishError {
    #[must_use]
    pub fn new(kind: PublishErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from message text alone, classifying by substring.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: PublishErrorKind::from_message(&message),
            message,
        }
    }
}

/// One publish call's inputs.
#[derive(Debug, Clone)]
pub struct PublishRequest<'a> {
    pub file_path: &'a Path,
    pub title: &'a str,
    pub description: &'a str,
    pub tags: &'a [String],
    pub privacy: &'a str,
    pub scheduled_publish_time: Option<DateTime<Utc>>,
}

/// Publishes a rendered video, returning the live post URL.
pub trait Publisher {
    fn publish(
        &self,
        request: &PublishRequest<'_>,
    ) -> impl std::future::Future<Output = Result<String, PublishError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_phrases_classify_as_quota() {
        assert_eq!(
            PublishErrorKind::from_message("uploadLimitExceeded: quota exceeded"),
            PublishErrorKind::Quota
        );
        assert_eq!(
            PublishErrorKind::from_message("The user has exceeded their Daily Limit"),
            PublishErrorKind::Quota
        );
    }

    #[test]
    fn auth_phrases_classify_as_auth() {
        assert_eq!(
            PublishErrorKind::from_message("401 Unauthorized"),
            PublishErrorKind::Auth
        );
        assert_eq!(
            PublishErrorKind::from_message("invalid_grant: token revoked"),
            PublishErrorKind::Auth
        );
    }

    #[test]
    fn duplicate_phrases_classify_as_duplicate() {
        assert_eq!(
            PublishErrorKind::from_message("rejected: duplicate video detected"),
            PublishErrorKind::Duplicate
        );
    }

    #[test]
    fn quota_takes_precedence_over_later_matches() {
        // A message mentioning both quota and auth wording stays quota.
        assert_eq!(
            PublishErrorKind::from_message("quota check failed for this auth session"),
            PublishErrorKind::Quota
        );
    }

    #[test]
    fn unmatched_messages_classify_as_unknown() {
        assert_eq!(
            PublishErrorKind::from_message("connection reset by peer"),
            PublishErrorKind::Unknown
        );
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = PublishError::new(PublishErrorKind::Quota, "quota exceeded");
        assert_eq!(err.to_string(), "quota: quota exceeded");
    }
}
