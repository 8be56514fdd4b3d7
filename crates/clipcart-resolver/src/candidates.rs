//! Candidate URL hygiene shared by every resolution strategy.

/// Returns `true` for an `http(s)` URL that carries a known media extension
/// (`.mp4` or `.m3u8`) anywhere in its path or query.
#[must_use]
pub fn is_media_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://"))
        && (url.contains(".mp4") || url.contains(".m3u8"))
}

/// Extracts every media-looking absolute URL embedded in free text.
#[must_use]
pub fn extract_media_urls(text: &str) -> Vec<String> {
    let re = regex::Regex::new(r#"https?://[^"'\s\\]+\.(?:mp4|m3u8)[^"'\s\\]*"#)
        .expect("valid regex");
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// De-duplicates candidates preserving discovery order and drops anything
/// that cannot be fetched out-of-browser (`blob:` URIs, non-http schemes).
#[must_use]
pub fn sanitize_candidates<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    urls.into_iter()
        .filter(|u| !u.starts_with("blob:"))
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_requires_http_scheme() {
        assert!(is_media_url("https://cdn/a.mp4"));
        assert!(is_media_url("http://cdn/live/index.m3u8?token=1"));
        assert!(!is_media_url("ftp://cdn/a.mp4"));
        assert!(!is_media_url("blob:https://cdn/xyz"));
    }

    #[test]
    fn media_url_requires_media_extension() {
        assert!(!is_media_url("https://cdn/a.jpg"));
        assert!(!is_media_url("https://cdn/watch?v=abc"));
    }

    #[test]
    fn extract_media_urls_finds_embedded_candidates() {
        let text = r#"var a = "https://cdn/a.mp4"; var b = 'https://cdn/b.m3u8?sig=x';"#;
        assert_eq!(
            extract_media_urls(text),
            vec![
                "https://cdn/a.mp4".to_string(),
                "https://cdn/b.m3u8?sig=x".to_string(),
            ]
        );
    }

    #[test]
    fn sanitize_preserves_first_occurrence_order() {
        let urls = vec![
            "https://cdn/a.mp4".to_string(),
            "https://cdn/b.mp4".to_string(),
            "https://cdn/a.mp4".to_string(),
        ];
        assert_eq!(
            sanitize_candidates(urls),
            vec!["https://cdn/a.mp4".to_string(), "https://cdn/b.mp4".to_string()]
        );
    }

    #[test]
    fn sanitize_rejects_blob_uris() {
        let urls = vec![
            "blob:https://page/0b1-2c3".to_string(),
            "https://cdn/a.mp4".to_string(),
        ];
        assert_eq!(sanitize_candidates(urls), vec!["https://cdn/a.mp4".to_string()]);
    }
}
