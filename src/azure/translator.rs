//! Azure Translator v3.0 REST client.
//!
//! Two operations are used: `translate` (Mandarin → English gloss) and
//! `transliterate` (hanzi → tone-marked pinyin).  Both post a single-item
//! body and read the first result back.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Script;

// ---------------------------------------------------------------------------
// TranslatorError
// ---------------------------------------------------------------------------

/// Errors from the Translator service.
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the client timeout.
    #[error("translator request timed out")]
    Timeout,

    /// Non-success HTTP status from the service.
    #[error("translator returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed as expected JSON.
    #[error("failed to parse translator response: {0}")]
    Parse(String),

    /// The service answered with no usable result.
    #[error("translator returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslatorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslatorError::Timeout
        } else {
            TranslatorError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for the translation/transliteration seam.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn Translator>`.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `hanzi` into English.
    async fn translate(&self, hanzi: &str) -> Result<String, TranslatorError>;

    /// Transliterate `hanzi` to Latin script (tone-marked pinyin).
    async fn transliterate(&self, hanzi: &str) -> Result<String, TranslatorError>;
}

// ---------------------------------------------------------------------------
// AzureTranslator
// ---------------------------------------------------------------------------

/// Client for the Azure Translator REST API.
pub struct AzureTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region: String,
    script: Script,
}

const API_VERSION: &str = "3.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

impl AzureTranslator {
    /// Build a client from the resolved credentials.
    ///
    /// `endpoint` is the resource base URL, e.g.
    /// `https://api.cognitive.microsofttranslator.com`.
    pub fn new(endpoint: String, api_key: String, region: String, script: Script) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            region,
            script,
        }
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        text: &str,
    ) -> Result<serde_json::Value, TranslatorError> {
        let body = serde_json::json!([{ "Text": text }]);

        let response = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .query(query)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| TranslatorError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Translator for AzureTranslator {
    /// Translate `hanzi` into English and return the first translation.
    async fn translate(&self, hanzi: &str) -> Result<String, TranslatorError> {
        log::debug!("Translating hanzi");
        let url = format!("{}/translate", self.endpoint);

        let json = self
            .post(&url, &[("from", self.script.language_tag()), ("to", "en")], hanzi)
            .await?;

        let translated = json[0]["translations"][0]["text"]
            .as_str()
            .ok_or(TranslatorError::EmptyResponse)?
            .to_string();

        log::debug!("Translation successful: {translated}");
        Ok(translated)
    }

    async fn transliterate(&self, hanzi: &str) -> Result<String, TranslatorError> {
        log::debug!("Transliterating hanzi");
        let url = format!("{}/transliterate", self.endpoint);

        let json = self
            .post(
                &url,
                &[
                    ("language", self.script.language_tag()),
                    ("fromScript", self.script.script_tag()),
                    ("toScript", "Latn"),
                ],
                hanzi,
            )
            .await?;

        let reading = json[0]["text"]
            .as_str()
            .ok_or(TranslatorError::EmptyResponse)?
            .to_string();

        log::debug!("Transliteration successful: {reading}");
        Ok(reading)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let t = AzureTranslator::new(
            "https://api.cognitive.microsofttranslator.com/".into(),
            "key".into(),
            "eastasia".into(),
            Script::Simplified,
        );
        assert_eq!(t.endpoint, "https://api.cognitive.microsofttranslator.com");
    }

    #[test]
    fn script_decides_language_tags() {
        assert_eq!(Script::Simplified.language_tag(), "zh-Hans");
        assert_eq!(Script::Traditional.language_tag(), "zh-Hant");
        assert_eq!(Script::Traditional.script_tag(), "Hant");
    }
}
