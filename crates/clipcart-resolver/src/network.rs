//! Passive network-traffic mining.
//!
//! Works over the captures a page session recorded: direct media responses,
//! media-looking URLs, and JSON API payloads that smuggle the player URL.

use crate::candidates::{extract_media_urls, is_media_url};
use crate::page::NetworkCapture;
use crate::runtime_data::{collect_media_urls, MAX_WALK_DEPTH};

/// Scans captured responses in arrival order for media URLs.
///
/// A capture qualifies directly when the browser classified it as `media`,
/// its content type is `video/mp4`, or its URL carries a media extension.
/// JSON responses (content type `json`, or gateway URLs containing `mtop`)
/// are mined twice: a raw-text scan for embedded URLs, then a structural
/// walk of the parsed payload.
#[must_use]
pub fn scan_network_captures(captures: &[NetworkCapture]) -> Vec<String> {
    let mut found = Vec::new();

    for capture in captures {
        if capture.resource_type.as_deref() == Some("media") {
            found.push(capture.url.clone());
            continue;
        }
        if capture.content_type.contains("video/mp4") || is_media_url(&capture.url) {
            found.push(capture.url.clone());
            continue;
        }

        let json_like = capture.content_type.contains("json") || capture.url.contains("mtop");
        if !json_like {
            continue;
        }
        let Some(body) = &capture.body else {
            continue;
        };
        found.extend(extract_media_urls(body));
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            found.extend(collect_media_urls(&value, MAX_WALK_DEPTH));
        }
    }

    found
}

/// Retrospective scan of resource-timing entry URLs.
#[must_use]
pub fn scan_resource_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|u| u.contains(".mp4") || u.contains(".m3u8"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(url: &str, content_type: &str) -> NetworkCapture {
        NetworkCapture {
            url: url.to_string(),
            content_type: content_type.to_string(),
            resource_type: None,
            body: None,
        }
    }

    #[test]
    fn media_resource_type_qualifies_regardless_of_url() {
        let captures = vec![NetworkCapture {
            url: "https://cdn/stream/8714".to_string(),
            content_type: "application/octet-stream".to_string(),
            resource_type: Some("media".to_string()),
            body: None,
        }];
        assert_eq!(
            scan_network_captures(&captures),
            vec!["https://cdn/stream/8714".to_string()]
        );
    }

    #[test]
    fn video_content_type_qualifies() {
        let captures = vec![capture("https://cdn/clip", "video/mp4")];
        assert_eq!(
            scan_network_captures(&captures),
            vec!["https://cdn/clip".to_string()]
        );
    }

    #[test]
    fn media_extension_in_url_qualifies() {
        let captures = vec![capture("https://cdn/clip.m3u8?sig=1", "text/plain")];
        assert_eq!(
            scan_network_captures(&captures),
            vec!["https://cdn/clip.m3u8?sig=1".to_string()]
        );
    }

    #[test]
    fn json_bodies_are_mined_both_ways() {
        let captures = vec![NetworkCapture {
            url: "https://api.example/mtop.item.get".to_string(),
            content_type: "application/json".to_string(),
            resource_type: Some("xhr".to_string()),
            // The text scan finds a.mp4; the structural walk finds the
            // extensionless URL under the "videoUrl" key.
            body: Some(
                r#"{"videoUrl": "https://cdn/play/8714", "raw": "see https://cdn/a.mp4"}"#
                    .to_string(),
            ),
        }];
        let found = scan_network_captures(&captures);
        assert!(found.contains(&"https://cdn/a.mp4".to_string()));
        assert!(found.contains(&"https://cdn/play/8714".to_string()));
    }

    #[test]
    fn non_media_non_json_captures_are_ignored() {
        let captures = vec![capture("https://cdn/app.css", "text/css")];
        assert!(scan_network_captures(&captures).is_empty());
    }

    #[test]
    fn resource_urls_filter_on_media_extension() {
        let urls = vec![
            "https://cdn/app.js".to_string(),
            "https://cdn/clip.mp4".to_string(),
            "https://cdn/live.m3u8".to_string(),
        ];
        assert_eq!(
            scan_resource_urls(&urls),
            vec![
                "https://cdn/clip.mp4".to_string(),
                "https://cdn/live.m3u8".to_string(),
            ]
        );
    }
}
