//! Target-path resolution for the stage-owned storage directories.
//!
//! Every path is computed once and recorded on the entity; nothing
//! rediscovers files by scanning a directory. Acquisition owns the raw
//! directory, render owns the processed directory.

use std::path::{Path, PathBuf};

/// Highest collision suffix probed before giving up and reusing the base
/// name. Keeps the probe bounded on pathological title collisions.
const MAX_NAME_ATTEMPTS: u32 = 49;

/// Replace filesystem-hostile characters with `_` and trim. An empty or
/// fully-hostile title falls back to `"product"`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        "product".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Base filename for a raw download: sanitized title, spaces collapsed to
/// underscores, `.mp4` extension.
#[must_use]
pub fn build_filename(title: &str) -> String {
    format!("{}.mp4", sanitize_title(title).replace(' ', "_"))
}

/// Filename for a rendered artifact.
#[must_use]
pub fn build_output_name(title: &str) -> String {
    format!("{}_final.mp4", sanitize_title(title).replace(' ', "_"))
}

/// Picks a collision-free path for `filename` inside `dir`.
///
/// An existing file is never overwritten: the stem is suffixed `_2`, `_3`,
/// ... up to `_49`. If every probe is taken the base path is returned —
/// callers treat that as the bounded-probe escape hatch, not a license to
/// clobber silently (it only occurs after 49 same-title collisions).
#[must_use]
pub fn resolve_target_path(dir: &Path, filename: &str) -> PathBuf {
    let target = dir.join(filename);
    if !target.exists() {
        return target;
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = target
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for index in 2..=MAX_NAME_ATTEMPTS {
        let candidate = dir.join(format!("{stem}_{index}.{extension}"));
        if !candidate.exists() {
            return candidate;
        }
    }
    target
}

/// Create the stage storage directories if they do not exist.
///
/// # Errors
///
/// Returns the underlying I/O error if a directory cannot be created.
pub fn ensure_storage_dirs(raw_dir: &Path, processed_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(raw_dir)?;
    std::fs::create_dir_all(processed_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_hostile_characters() {
        assert_eq!(
            sanitize_title(r#"A/B\C:D*E?F"G<H>I|J"#),
            "A_B_C_D_E_F_G_H_I_J"
        );
    }

    #[test]
    fn sanitize_falls_back_for_empty_titles() {
        assert_eq!(sanitize_title("   "), "product");
        assert_eq!(sanitize_title("???"), "___");
    }

    #[test]
    fn filename_replaces_spaces() {
        assert_eq!(build_filename("Mini Blender 2000"), "Mini_Blender_2000.mp4");
        assert_eq!(
            build_output_name("Mini Blender 2000"),
            "Mini_Blender_2000_final.mp4"
        );
    }

    #[test]
    fn target_path_is_base_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve_target_path(dir.path(), "clip.mp4");
        assert_eq!(target, dir.path().join("clip.mp4"));
    }

    #[test]
    fn target_path_never_reuses_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"x").unwrap();

        let second = resolve_target_path(dir.path(), "clip.mp4");
        assert_eq!(second, dir.path().join("clip_2.mp4"));

        std::fs::write(&second, b"x").unwrap();
        let third = resolve_target_path(dir.path(), "clip.mp4");
        assert_eq!(third, dir.path().join("clip_3.mp4"));
    }

    #[test]
    fn resolving_twice_for_the_same_title_yields_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let first = resolve_target_path(dir.path(), &build_filename("Gadget"));
        std::fs::write(&first, b"x").unwrap();
        let second = resolve_target_path(dir.path(), &build_filename("Gadget"));
        assert_ne!(first, second);
    }

    #[test]
    fn probe_is_bounded_on_pathological_collisions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"x").unwrap();
        for index in 2..=MAX_NAME_ATTEMPTS {
            std::fs::write(dir.path().join(format!("clip_{index}.mp4")), b"x").unwrap();
        }
        // Exhausted: falls back to the base path rather than probing forever.
        let target = resolve_target_path(dir.path(), "clip.mp4");
        assert_eq!(target, dir.path().join("clip.mp4"));
    }
}
