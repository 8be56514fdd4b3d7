//! Structured-data extraction from embedded script payloads.
//!
//! Listing pages ship their hydration state under a handful of well-known
//! globals. This module pulls those payloads out of raw HTML and walks them
//! for media URLs. Traversal is depth-capped so a hostile payload cannot
//! recurse unboundedly.

use serde_json::Value;

use crate::candidates::is_media_url;

/// Globals that carry listing hydration state on the sites we collect from.
pub const RUNTIME_DATA_MARKERS: &[&str] = &[
    "_runData_",
    "runParams",
    "__AER_DATA__",
    "__RUNTIME_CONFIG__",
];

/// Maximum nesting depth walked inside one runtime payload.
pub const MAX_WALK_DEPTH: usize = 32;

/// Finds runtime-data payloads assigned to known globals inside raw HTML and
/// parses each as JSON. Payloads that fail to parse are skipped.
#[must_use]
pub fn extract_runtime_payloads(html: &str) -> Vec<Value> {
    let mut payloads = Vec::new();
    for marker in RUNTIME_DATA_MARKERS {
        let mut search_from = 0;
        while let Some(found) = html[search_from..].find(marker) {
            let marker_end = search_from + found + marker.len();
            search_from = marker_end;

            let Some(assign) = find_assignment_start(&html[marker_end..]) else {
                continue;
            };
            let Some(raw) = extract_balanced_json(&html[marker_end + assign..]) else {
                continue;
            };
            if let Ok(value) = serde_json::from_str::<Value>(raw) {
                payloads.push(value);
            }
        }
    }
    payloads
}

/// Walks a parsed payload collecting media URLs, capped at `max_depth`.
///
/// Two shapes qualify: any string value that looks like a media URL, and any
/// http(s) string stored under a key containing `"video"` (players often
/// keep extensionless URLs there).
#[must_use]
pub fn collect_media_urls(value: &Value, max_depth: usize) -> Vec<String> {
    let mut found = Vec::new();
    walk(value, max_depth, &mut found);
    found
}

fn walk(value: &Value, depth: usize, found: &mut Vec<String>) {
    if depth == 0 {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.to_lowercase().contains("video") {
                    if let Value::String(s) = child {
                        if s.starts_with("http://") || s.starts_with("https://") {
                            found.push(s.clone());
                        }
                    }
                }
                walk(child, depth - 1, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, depth - 1, found);
            }
        }
        Value::String(s) => {
            if is_media_url(s) {
                found.push(s.clone());
            }
        }
        _ => {}
    }
}

/// Returns the offset just past an `=` or `:` assignment following a marker,
/// tolerating whitespace. `None` when the marker is a bare mention.
fn find_assignment_start(s: &str) -> Option<usize> {
    let mut offset = 0;
    for c in s.chars() {
        match c {
            ' ' | '\t' | '"' | '\'' => offset += c.len_utf8(),
            '=' | ':' => return Some(offset + c.len_utf8()),
            _ => return None,
        }
    }
    None
}

/// Extracts the first balanced JSON object or array from `s`, starting at
/// the first `{` or `[`. String literals (with escapes) are skipped so
/// braces inside values do not confuse the depth count; a closer that does
/// not match its opener aborts the scan.
#[must_use]
pub fn extract_balanced_json(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let start = s.find(['{', '['])?;
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => stack.push(b),
            b'}' | b']' => {
                let opener = stack.pop()?;
                let matches = (opener == b'{' && b == b'}') || (opener == b'[' && b == b']');
                if !matches {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_payload_assigned_to_known_global() {
        let html = r#"
            <script>
                window.runParams = {"data": {"videoUrl": "https://cdn/p.mp4"}};
            </script>
        "#;
        let payloads = extract_runtime_payloads(html);
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0]["data"]["videoUrl"],
            json!("https://cdn/p.mp4")
        );
    }

    #[test]
    fn ignores_bare_marker_mentions() {
        let html = "<script>if (!window.runParams) load();</script>";
        assert!(extract_runtime_payloads(html).is_empty());
    }

    #[test]
    fn skips_unparseable_assignments() {
        let html = "<script>runParams = {broken;</script>";
        assert!(extract_runtime_payloads(html).is_empty());
    }

    #[test]
    fn walker_finds_media_url_strings_at_depth() {
        let value = json!({
            "page": {
                "modules": [
                    {"gallery": ["https://cdn/clip.mp4"]},
                    {"image": "https://cdn/thumb.jpg"}
                ]
            }
        });
        assert_eq!(
            collect_media_urls(&value, MAX_WALK_DEPTH),
            vec!["https://cdn/clip.mp4".to_string()]
        );
    }

    #[test]
    fn walker_accepts_extensionless_urls_under_video_keys() {
        let value = json!({"videoPlayUrl": "https://cdn/stream/8714"});
        assert_eq!(
            collect_media_urls(&value, MAX_WALK_DEPTH),
            vec!["https://cdn/stream/8714".to_string()]
        );
    }

    #[test]
    fn walker_ignores_non_http_video_values() {
        let value = json!({"videoId": "8714", "video": 42});
        assert!(collect_media_urls(&value, MAX_WALK_DEPTH).is_empty());
    }

    #[test]
    fn walker_stops_at_depth_cap() {
        // Build a payload nested deeper than the cap with the URL at the bottom.
        let mut value = json!("https://cdn/deep.mp4");
        for _ in 0..(MAX_WALK_DEPTH + 4) {
            value = json!([value]);
        }
        assert!(collect_media_urls(&value, MAX_WALK_DEPTH).is_empty());
    }

    #[test]
    fn balanced_json_accepts_nested_objects() {
        let s = r#"[{"a": 1}, {"b": 2}] trailing"#;
        assert_eq!(extract_balanced_json(s), Some(r#"[{"a": 1}, {"b": 2}]"#));
    }

    #[test]
    fn balanced_json_rejects_mismatched_closer() {
        assert_eq!(extract_balanced_json("[42}"), None);
    }

    #[test]
    fn balanced_json_skips_braces_inside_strings() {
        let s = r#"{"text": "closing } brace", "n": 1};"#;
        assert_eq!(
            extract_balanced_json(s),
            Some(r#"{"text": "closing } brace", "n": 1}"#)
        );
    }
}
