//! Retry-backoff policy for publish failures.
//!
//! Quota failures wait out the 24-hour window. Auth and duplicate failures
//! get no automatic retry at all — retry storms against a broken credential
//! help nobody, and a duplicate stays a duplicate. Everything else is
//! assumed transient and retried after two hours.

use chrono::{DateTime, Duration, Utc};

use crate::publisher::PublishErrorKind;

/// How long to hold an asset back after a failure of this kind. `None`
/// means no automatic retry — the asset stays in `ERROR` until an operator
/// intervenes.
#[must_use]
pub fn retry_delay(kind: PublishErrorKind) -> Option<Duration> {
    match kind {
        PublishErrorKind::Quota => Some(Duration::hours(24)),
        PublishErrorKind::Auth | PublishErrorKind::Duplicate => None,
        PublishErrorKind::Unknown => Some(Duration::hours(2)),
    }
}

/// The `next_retry_at` value recorded on a `FAILED` log row.
#[must_use]
pub fn next_retry_at(kind: PublishErrorKind, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    retry_delay(kind).map(|delay| now + delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_waits_a_full_day() {
        let now = Utc::now();
        let retry = next_retry_at(PublishErrorKind::Quota, now).expect("quota retries");
        assert_eq!(retry - now, Duration::hours(24));
    }

    #[test]
    fn unknown_waits_two_hours() {
        let now = Utc::now();
        let retry = next_retry_at(PublishErrorKind::Unknown, now).expect("unknown retries");
        assert_eq!(retry - now, Duration::hours(2));
    }

    #[test]
    fn auth_and_duplicate_never_auto_retry() {
        let now = Utc::now();
        assert!(next_retry_at(PublishErrorKind::Auth, now).is_none());
        assert!(next_retry_at(PublishErrorKind::Duplicate, now).is_none());
    }
}
