//! Google Cloud Translation API v2 backend.
//!
//! Translates with `POST {base_url}` and detects with `POST {base_url}/detect`.
//! The API key comes from config or `GOOGLE_TRANSLATE_API_KEY`.
//! Docs: <https://cloud.google.com/translate/docs/reference/rest/v2/translate>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tolk_core::{
    config::TranslatorConfig,
    error::TolkError,
    traits::{Detector, Translator},
};
use tracing::debug;

/// Google Translate v2 client.
#[derive(Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

// --- Google API types ---

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: [&'a str; 1],
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    #[serde(default)]
    #[allow(dead_code)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    /// One list of candidates per input string.
    #[serde(default)]
    detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Detection {
    language: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    is_reliable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl GoogleTranslate {
    /// Create a client with an explicit key.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, TolkError> {
        if api_key.trim().is_empty() {
            return Err(TolkError::Config(
                "Google Translate API key is empty. Set translator.google.api_key \
                 or GOOGLE_TRANSLATE_API_KEY."
                    .into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TolkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from config values.
    pub fn from_config(cfg: &TranslatorConfig) -> Result<Self, TolkError> {
        Self::new(
            cfg.google.api_key.clone(),
            cfg.google.base_url.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    /// POST `body` to `url` and return the response text on a 2xx status.
    async fn post<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        wrap: fn(String) -> TolkError,
    ) -> Result<String, TolkError> {
        debug!("POST {url}");
        let resp = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    wrap(format!("request timed out after {}s", self.timeout.as_secs()))
                } else {
                    wrap(format!("request failed: {}", e.without_url()))
                }
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| wrap(format!("failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(wrap(format!("API error ({status}): {detail}")));
        }

        Ok(text)
    }
}

/// Decode a translate response into the first translated string.
fn decode_translation(body: &str) -> Result<String, TolkError> {
    let resp: TranslateResponse =
        serde_json::from_str(body).map_err(|e| TolkError::GatewayDecode(e.to_string()))?;
    resp.data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| TolkError::GatewayDecode("response has no translations".into()))
}

/// Decode a detect response into the most confident language code.
fn decode_detection(body: &str) -> Result<String, TolkError> {
    let resp: DetectResponse =
        serde_json::from_str(body).map_err(|e| TolkError::DetectionDecode(e.to_string()))?;
    resp.data
        .detections
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .max_by(|a, b| {
            a.confidence
                .unwrap_or(0.0)
                .total_cmp(&b.confidence.unwrap_or(0.0))
        })
        .map(|d| d.language)
        .filter(|lang| !lang.is_empty())
        .ok_or_else(|| TolkError::DetectionDecode("response has no detections".into()))
}

#[async_trait]
impl Translator for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source_hint: Option<&str>) -> Result<String, TolkError> {
        let body = TranslateRequest {
            q: [text],
            target: "en",
            format: "text",
            source: source_hint,
        };
        let resp = self.post(&self.base_url, &body, TolkError::Gateway).await?;
        decode_translation(&resp)
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl Detector for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn detect(&self, text: &str) -> Result<String, TolkError> {
        let url = format!("{}/detect", self.base_url);
        let resp = self
            .post(&url, &DetectRequest { q: [text] }, TolkError::Detection)
            .await?;
        decode_detection(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let err = GoogleTranslate::new(" ".into(), "http://x".into(), Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, TolkError::Config(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let g = GoogleTranslate::new("k".into(), "http://x/v2/".into(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(g.base_url, "http://x/v2");
    }

    #[test]
    fn test_translate_request_shape() {
        let body = TranslateRequest {
            q: ["bonjour"],
            target: "en",
            format: "text",
            source: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["q"][0], "bonjour");
        assert_eq!(json["target"], "en");
        assert!(json.get("source").is_none());

        let body = TranslateRequest {
            source: Some("fr"),
            ..body
        };
        assert_eq!(serde_json::to_value(&body).unwrap()["source"], "fr");
    }

    #[test]
    fn test_decode_translation() {
        let body = r#"{"data":{"translations":[{"translatedText":"hello the world","detectedSourceLanguage":"fr"}]}}"#;
        assert_eq!(decode_translation(body).unwrap(), "hello the world");
    }

    #[test]
    fn test_decode_translation_malformed() {
        assert!(matches!(
            decode_translation("not json"),
            Err(TolkError::GatewayDecode(_))
        ));
        assert!(matches!(
            decode_translation(r#"{"data":{"translations":[]}}"#),
            Err(TolkError::GatewayDecode(_))
        ));
        assert!(matches!(
            decode_translation(r#"{"data":{"translations":[{"text":"x"}]}}"#),
            Err(TolkError::GatewayDecode(_))
        ));
    }

    #[test]
    fn test_decode_detection_picks_most_confident() {
        let body = r#"{"data":{"detections":[[
            {"language":"es","confidence":0.4,"isReliable":false},
            {"language":"fr","confidence":0.9,"isReliable":true}
        ]]}}"#;
        assert_eq!(decode_detection(body).unwrap(), "fr");
    }

    #[test]
    fn test_decode_detection_without_confidence() {
        let body = r#"{"data":{"detections":[[{"language":"de"}]]}}"#;
        assert_eq!(decode_detection(body).unwrap(), "de");
    }

    #[test]
    fn test_decode_detection_malformed() {
        assert!(matches!(
            decode_detection(r#"{"data":{"detections":[]}}"#),
            Err(TolkError::DetectionDecode(_))
        ));
        assert!(matches!(
            decode_detection(r#"{"data":{}}"#),
            Err(TolkError::DetectionDecode(_))
        ));
        assert!(matches!(
            decode_detection("[]"),
            Err(TolkError::DetectionDecode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_gateway_error() {
        // Port 9 (discard) on loopback refuses connections.
        let g = GoogleTranslate::new(
            "k".into(),
            "http://127.0.0.1:9/v2".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(matches!(
            g.translate("hola", None).await,
            Err(TolkError::Gateway(_))
        ));
        assert!(matches!(g.detect("hola").await, Err(TolkError::Detection(_))));
    }
}
