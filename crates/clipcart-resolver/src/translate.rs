//! Title translation boundary for cross-language search queries.
//!
//! Only the interface matters here: the social-search fallback wants the
//! product title in Chinese and English alongside the original. Failures
//! never fail resolution — they just mean fewer query variants.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::ResolverError;

/// Translates text into a target language, or declines (`Ok(None)`).
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        target_lang: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, ResolverError>> + Send;
}

/// No-op translator used when no endpoint is configured.
pub struct DisabledTranslator;

impl Translator for DisabledTranslator {
    async fn translate(
        &self,
        _text: &str,
        _target_lang: &str,
    ) -> Result<Option<String>, ResolverError> {
        Ok(None)
    }
}

/// Client for a gtx-style translate endpoint.
///
/// The endpoint answers `GET {base}?client=gtx&sl=auto&tl={lang}&dt=t&q={q}`
/// with a nested JSON array whose first element lists `[translated, source,
/// ...]` chunks.
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranslator {
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
    ) -> Result<Option<String>, ResolverError> {
        let query = utf8_percent_encode(text, NON_ALPHANUMERIC);
        let url = format!(
            "{}?client=gtx&sl=auto&tl={target_lang}&dt=t&q={query}",
            self.base_url
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ResolverError::Deserialize {
                context: "translate response".to_string(),
                source: e,
            })?;

        // First element is the chunk list; each chunk's first element is the
        // translated text.
        let chunks = value.get(0).and_then(serde_json::Value::as_array);
        let translated: String = chunks
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk.get(0).and_then(serde_json::Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if translated.is_empty() {
            Ok(None)
        } else {
            Ok(Some(translated))
        }
    }
}

/// Builds the title variant list: the original, then Chinese and English
/// translations when they differ. Translation errors are swallowed with a
/// debug log — resolution proceeds with whatever variants exist.
pub async fn translate_variants<T: Translator>(translator: &T, text: &str) -> Vec<String> {
    let mut variants = vec![text.to_string()];
    for lang in ["zh-CN", "en"] {
        match translator.translate(text, lang).await {
            Ok(Some(translated)) if !variants.contains(&translated) => {
                variants.push(translated);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(lang, error = %e, "translation failed; skipping variant");
            }
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn disabled_translator_declines() {
        let result = DisabledTranslator.translate("hello", "en").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn http_translator_joins_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("tl", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                [["Mini ", "미니 ", null], ["Blender", "블렌더", null]],
                null
            ])))
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&server.uri(), 5, "test-agent").unwrap();
        let result = translator.translate("미니 블렌더", "en").await.unwrap();
        assert_eq!(result.as_deref(), Some("Mini Blender"));
    }

    #[tokio::test]
    async fn http_translator_maps_empty_result_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[], null])))
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&server.uri(), 5, "test-agent").unwrap();
        let result = translator.translate("x", "en").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn http_translator_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&server.uri(), 5, "test-agent").unwrap();
        let result = translator.translate("x", "en").await;
        assert!(matches!(
            result,
            Err(ResolverError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn variants_start_with_the_original_and_swallow_failures() {
        struct FailingTranslator;
        impl Translator for FailingTranslator {
            async fn translate(
                &self,
                _text: &str,
                _target_lang: &str,
            ) -> Result<Option<String>, ResolverError> {
                Err(ResolverError::UnexpectedStatus {
                    status: 503,
                    url: "x".to_string(),
                })
            }
        }

        let variants = translate_variants(&FailingTranslator, "Mini Blender").await;
        assert_eq!(variants, vec!["Mini Blender".to_string()]);
    }

    #[tokio::test]
    async fn variants_deduplicate_identical_translations() {
        struct EchoTranslator;
        impl Translator for EchoTranslator {
            async fn translate(
                &self,
                text: &str,
                _target_lang: &str,
            ) -> Result<Option<String>, ResolverError> {
                Ok(Some(text.to_string()))
            }
        }

        let variants = translate_variants(&EchoTranslator, "Mini Blender").await;
        assert_eq!(variants, vec!["Mini Blender".to_string()]);
    }
}
