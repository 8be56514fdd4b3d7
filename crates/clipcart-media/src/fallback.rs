//! Static fallback pool: pre-existing local files copied round-robin when
//! every network candidate fails, so downstream stages always have material
//! in degraded or test environments.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Round-robin pool over configured local files. Missing entries are
/// dropped at construction.
#[derive(Debug, Default)]
pub struct FallbackPool {
    pool: VecDeque<PathBuf>,
}

impl FallbackPool {
    #[must_use]
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let pool = paths
            .iter()
            .filter(|p| {
                let exists = p.exists();
                if !exists {
                    tracing::warn!(path = %p.display(), "fallback pool entry missing; skipping");
                }
                exists
            })
            .cloned()
            .collect();
        Self { pool }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Copies the next pool file to `target` and rotates it to the back.
    /// Returns `false` when the pool is empty.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the copy fails; the source stays
    /// in rotation so a transient failure does not shrink the pool.
    pub fn copy_next(&mut self, target: &Path) -> std::io::Result<bool> {
        let Some(source) = self.pool.pop_front() else {
            return Ok(false);
        };
        let result = std::fs::copy(&source, target);
        self.pool.push_back(source);
        result.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_are_dropped_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.mp4");
        std::fs::write(&present, b"a").unwrap();
        let absent = dir.path().join("missing.mp4");

        let pool = FallbackPool::from_paths(&[present, absent]);
        assert!(!pool.is_empty());
    }

    #[test]
    fn copy_rotates_round_robin() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mp4");
        std::fs::write(&a, b"aaa").unwrap();
        std::fs::write(&b, b"bbb").unwrap();

        let mut pool = FallbackPool::from_paths(&[a, b]);

        let t1 = dir.path().join("t1.mp4");
        let t2 = dir.path().join("t2.mp4");
        let t3 = dir.path().join("t3.mp4");
        assert!(pool.copy_next(&t1).unwrap());
        assert!(pool.copy_next(&t2).unwrap());
        assert!(pool.copy_next(&t3).unwrap());

        assert_eq!(std::fs::read(&t1).unwrap(), b"aaa");
        assert_eq!(std::fs::read(&t2).unwrap(), b"bbb");
        assert_eq!(std::fs::read(&t3).unwrap(), b"aaa", "pool wraps around");
    }

    #[test]
    fn empty_pool_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut pool = FallbackPool::from_paths(&[]);
        assert!(!pool.copy_next(&dir.path().join("t.mp4")).unwrap());
    }
}
