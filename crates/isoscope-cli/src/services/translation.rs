use super::{Cancellation, HttpClient, Result, ServiceError};
use crate::config::TranslationSettings;
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, warn};

const SERVICE: &str = "Translation";

/// Translates free-text descriptions into the configured display language.
///
/// Translation is best effort: a failed request yields the original text. Nothing is
/// cached; each call issues its own requests.
#[derive(Debug, Clone)]
pub struct Translator {
    http: HttpClient,
    url: String,
    settings: TranslationSettings,
}

impl Translator {
    pub fn new(http: HttpClient, url: &str, settings: TranslationSettings) -> Self {
        Self {
            http,
            url: url.to_string(),
            settings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Translated text, or `text` itself when translation is disabled, the input is blank,
    /// or the request fails.
    pub async fn translate(&self, text: &str) -> String {
        if !self.settings.enabled || text.trim().is_empty() {
            return text.to_string();
        }
        match self.request(text).await {
            Ok(Some(translated)) => translated,
            Ok(None) => text.to_string(),
            Err(e) => {
                warn!("Translation failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }

    async fn request(&self, text: &str) -> Result<Option<String>> {
        let request = self.http.get(&self.url).query(&[
            ("client", "gtx"),
            ("sl", self.settings.source_language.as_str()),
            ("tl", self.settings.target_language.as_str()),
            ("dt", "t"),
            ("q", text),
        ]);
        let body = self.http.send(SERVICE, request).await?.text().await?;
        Ok(parse_translation(&body))
    }

    /// Translates a batch concurrently, at most `max-concurrent` requests at a time.
    ///
    /// Duplicate texts are requested once. The returned map goes from original to
    /// translated text. If `cancellation` fires first, outstanding requests are dropped
    /// and [`ServiceError::Cancelled`] is returned.
    pub async fn translate_all(
        &self,
        texts: &[String],
        mut cancellation: Cancellation,
    ) -> Result<HashMap<String, String>> {
        if !self.settings.enabled {
            return Ok(HashMap::new());
        }
        if cancellation.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        let mut unique: Vec<&str> = texts.iter().map(String::as_str).collect();
        unique.sort_unstable();
        unique.dedup();
        debug!("Translating {} distinct text(s)", unique.len());

        let batch = stream::iter(unique)
            .map(|text| async move { (text.to_string(), self.translate(text).await) })
            .buffer_unordered(self.settings.max_concurrent.max(1))
            .collect::<HashMap<_, _>>();

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                warn!("Translation batch cancelled");
                Err(ServiceError::Cancelled)
            }
            translations = batch => Ok(translations),
        }
    }
}

/// Joins the translated segments of a `translate_a/single` response
/// (`[[["Bonjour", "Hello", ...], ...], ...]`). Returns `None` for any other shape or an
/// empty translation.
pub fn parse_translation(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let segments = value.get(0)?.as_array()?;
    let joined: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::test_server::{response, serve};

    fn translator(url: &str, enabled: bool) -> Translator {
        let config = AppConfig::default();
        let http = HttpClient::new(&config.http).unwrap();
        let mut settings = config.translation;
        settings.enabled = enabled;
        settings.max_concurrent = 1;
        Translator::new(http, url, settings)
    }

    #[test]
    fn parse_translation_joins_segments() {
        let body = r#"[[["Protéine de réparation. ","DNA repair protein. ",null,null,10],["Suppresseur.","Suppressor.",null,null,10]],null,"en"]"#;
        assert_eq!(
            parse_translation(body).as_deref(),
            Some("Protéine de réparation. Suppresseur.")
        );
    }

    #[test]
    fn parse_translation_rejects_other_shapes() {
        assert_eq!(parse_translation("{}"), None);
        assert_eq!(parse_translation("[]"), None);
        assert_eq!(parse_translation("[[[null]]]"), None);
        assert_eq!(parse_translation("not json"), None);
    }

    #[tokio::test]
    async fn translate_sends_language_pair() {
        let server = serve(vec![response("200 OK", &[], r#"[[["Bonjour","Hello"]]]"#)]).await;
        let t = translator(&format!("{}/translate_a/single", server.base_url), true);

        assert_eq!(t.translate("Hello").await, "Bonjour");
        let request = &server.requests()[0];
        assert!(request.starts_with(
            "GET /translate_a/single?client=gtx&sl=en&tl=fr&dt=t&q=Hello "
        ));
    }

    #[tokio::test]
    async fn failure_and_blank_input_keep_original() {
        let server = serve(vec![response("500 Internal Server Error", &[], "")]).await;
        let t = translator(&server.base_url, true);
        assert_eq!(t.translate("Kinase").await, "Kinase");
        assert_eq!(t.translate("   ").await, "   ");
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn disabled_translator_makes_no_request() {
        let server = serve(vec![]).await;
        let t = translator(&server.base_url, false);
        let (_sender, cancellation) = Cancellation::channel();

        assert_eq!(t.translate("Kinase").await, "Kinase");
        assert!(t.translate_all(&["Kinase".into()], cancellation).await.unwrap().is_empty());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn batch_deduplicates_texts() {
        let server = serve(vec![response("200 OK", &[], r#"[[["Kinase FR","Kinase"]]]"#)]).await;
        let t = translator(&server.base_url, true);
        let (_sender, cancellation) = Cancellation::channel();

        let map = t
            .translate_all(&["Kinase".into(), "Kinase".into()], cancellation)
            .await
            .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map["Kinase"], "Kinase FR");
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_batch_returns_cancelled() {
        let server = serve(vec![]).await;
        let t = translator(&server.base_url, true);
        let (sender, cancellation) = Cancellation::channel();
        sender.send(true).unwrap();

        let err = t
            .translate_all(&["Kinase".into()], cancellation)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Cancelled));
    }
}
