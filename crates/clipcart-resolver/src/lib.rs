//! Promotional-video source resolution.
//!
//! Tries extraction strategies in priority order (rendered media tags,
//! embedded runtime data, passive network captures, raw-HTML scan,
//! cross-platform social search) and returns the first strategy's non-empty
//! candidate list. Resolution order is a priority hint only: a candidate is
//! proven usable by the downstream fetch, so acquisition walks the list.

pub mod candidates;
pub mod error;
pub mod network;
pub mod page;
pub mod queries;
pub mod runtime_data;
pub mod social;
pub mod translate;

pub use candidates::{extract_media_urls, is_media_url, sanitize_candidates};
pub use error::ResolverError;
pub use network::{scan_network_captures, scan_resource_urls};
pub use page::{HttpPageInspector, NetworkCapture, PageInspector, PageSnapshot};
pub use queries::build_queries;
pub use runtime_data::{collect_media_urls, extract_runtime_payloads, MAX_WALK_DEPTH};
pub use social::{SearchBases, SocialSearchClient};
pub use translate::{translate_variants, DisabledTranslator, HttpTranslator, Translator};

/// Resolve candidate video URLs for a product listing.
///
/// Each call re-runs the cascade from scratch; the sequence is finite and
/// stops at the first strategy that yields at least one candidate after
/// de-duplication and `blob:` rejection. Strategy-level failures are
/// swallowed and the next strategy is tried. Returns an empty list when
/// every strategy comes up dry.
pub async fn resolve_candidates<I, T>(
    inspector: &I,
    search: &SocialSearchClient,
    translator: &T,
    origin_url: &str,
    title: &str,
) -> Vec<String>
where
    I: PageInspector,
    T: Translator,
{
    let snapshot = match inspector.inspect(origin_url).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(origin_url, error = %e, "page inspection failed; falling back to search");
            PageSnapshot::default()
        }
    };

    // Strategy 1: rendered <video> element sources
    let found = sanitize_candidates(snapshot.video_sources.clone());
    if !found.is_empty() {
        tracing::debug!(origin_url, count = found.len(), "resolved from media tags");
        return found;
    }

    // Strategy 2: embedded runtime-data payloads
    let mut from_runtime = Vec::new();
    for payload in &snapshot.runtime_payloads {
        from_runtime.extend(collect_media_urls(payload, MAX_WALK_DEPTH));
    }
    let found = sanitize_candidates(from_runtime);
    if !found.is_empty() {
        tracing::debug!(origin_url, count = found.len(), "resolved from runtime data");
        return found;
    }

    // Strategy 3: passive network captures plus resource-timing entries
    let mut from_network = scan_network_captures(&snapshot.network);
    from_network.extend(scan_resource_urls(&snapshot.resource_urls));
    let found = sanitize_candidates(from_network);
    if !found.is_empty() {
        tracing::debug!(origin_url, count = found.len(), "resolved from network traffic");
        return found;
    }

    // Strategy 4: raw-HTML scan for embedded absolute media URLs
    let found = sanitize_candidates(extract_media_urls(&snapshot.html));
    if !found.is_empty() {
        tracing::debug!(origin_url, count = found.len(), "resolved from raw HTML");
        return found;
    }

    // Strategy 5: cross-platform social search on the product title
    let variants = translate_variants(translator, title).await;
    let search_queries = build_queries(&variants);
    if let Some(url) = search.find_social_video(&search_queries).await {
        tracing::debug!(origin_url, %url, "resolved from social search");
        return vec![url];
    }

    tracing::warn!(origin_url, "no video source resolved");
    Vec::new()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Inspector stub returning a canned snapshot.
    struct StubInspector {
        snapshot: PageSnapshot,
    }

    impl PageInspector for StubInspector {
        async fn inspect(&self, _url: &str) -> Result<PageSnapshot, ResolverError> {
            Ok(self.snapshot.clone())
        }
    }

    /// Inspector stub that always fails.
    struct FailingInspector;

    impl PageInspector for FailingInspector {
        async fn inspect(&self, url: &str) -> Result<PageSnapshot, ResolverError> {
            Err(ResolverError::Inspection {
                url: url.to_string(),
                reason: "browser unavailable".to_string(),
            })
        }
    }

    fn offline_search() -> SocialSearchClient {
        // Points at a closed port so any accidental strategy-5 call fails
        // fast instead of reaching the network.
        SocialSearchClient::with_bases(
            1,
            "test-agent",
            SearchBases {
                tiktok: "http://127.0.0.1:1".to_string(),
                instagram: "http://127.0.0.1:1".to_string(),
                dailymotion: "http://127.0.0.1:1".to_string(),
                youtube: "http://127.0.0.1:1".to_string(),
            },
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn media_tags_win_when_present() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                video_sources: vec!["https://cdn/a.mp4".to_string()],
                html: r#"<video src="https://cdn/other.mp4"></video>"#.to_string(),
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        assert_eq!(found, vec!["https://cdn/a.mp4".to_string()]);
    }

    #[tokio::test]
    async fn runtime_data_is_used_when_media_tags_are_empty() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                runtime_payloads: vec![serde_json::json!({
                    "item": {"videoUrl": "https://cdn/a.mp4"}
                })],
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        // Later strategies must not run: the snapshot has no network captures
        // or HTML, so any output proves strategy 2 short-circuited the cascade.
        assert_eq!(found, vec!["https://cdn/a.mp4".to_string()]);
    }

    #[tokio::test]
    async fn network_captures_are_third_in_priority() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                network: vec![NetworkCapture {
                    url: "https://cdn/live.m3u8".to_string(),
                    content_type: "application/vnd.apple.mpegurl".to_string(),
                    resource_type: None,
                    body: None,
                }],
                html: r#"src="https://cdn/from-html.mp4""#.to_string(),
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        assert_eq!(found, vec!["https://cdn/live.m3u8".to_string()]);
    }

    #[tokio::test]
    async fn raw_html_is_the_last_page_strategy() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                html: r#"<div data-src="https://cdn/embedded.mp4"></div>"#.to_string(),
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        assert_eq!(found, vec!["https://cdn/embedded.mp4".to_string()]);
    }

    #[tokio::test]
    async fn blob_only_sources_fall_through() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                video_sources: vec!["blob:https://site/0b1".to_string()],
                html: r#"src="https://cdn/real.mp4""#.to_string(),
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        assert_eq!(found, vec!["https://cdn/real.mp4".to_string()]);
    }

    #[tokio::test]
    async fn duplicates_within_a_strategy_collapse_in_order() {
        let inspector = StubInspector {
            snapshot: PageSnapshot {
                video_sources: vec![
                    "https://cdn/a.mp4".to_string(),
                    "https://cdn/b.mp4".to_string(),
                    "https://cdn/a.mp4".to_string(),
                ],
                ..PageSnapshot::default()
            },
        };
        let found = resolve_candidates(
            &inspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        assert_eq!(
            found,
            vec!["https://cdn/a.mp4".to_string(), "https://cdn/b.mp4".to_string()]
        );
    }

    #[tokio::test]
    async fn inspection_failure_degrades_to_empty_without_panicking() {
        let found = resolve_candidates(
            &FailingInspector,
            &offline_search(),
            &DisabledTranslator,
            "https://site/x",
            "Gadget",
        )
        .await;
        // Strategy 5 also fails (closed port), so resolution comes up dry.
        assert!(found.is_empty());
    }
}
