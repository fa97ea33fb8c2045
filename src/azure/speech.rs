//! Azure Speech text-to-speech REST client.
//!
//! Synthesizes one WAV file per card into the scratch directory and returns
//! the `[sound:…]` tag Anki uses to reference bundled media.  File names are
//! slugs derived from the source text (NFKC normalise, keep word characters,
//! collapse whitespace/dashes).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors from speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the client timeout.
    #[error("speech request timed out")]
    Timeout,

    /// Non-success HTTP status from the service.
    #[error("speech service returned HTTP {0}")]
    Status(u16),

    /// Writing the synthesized audio to disk failed.
    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesizedAudio
// ---------------------------------------------------------------------------

/// One synthesized clip: where it landed and the tag that references it.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Scratch-directory path of the WAV file (bundled into the package).
    pub path: PathBuf,
    /// `[sound:file.wav]` tag to place in the card's audio field.
    pub sound_tag: String,
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for the text-to-speech seam.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into a WAV file under `scratch_dir`.
    async fn synthesize(
        &self,
        text: &str,
        scratch_dir: &Path,
    ) -> Result<SynthesizedAudio, SpeechError>;
}

// ---------------------------------------------------------------------------
// AzureSpeech
// ---------------------------------------------------------------------------

/// Client for the Azure TTS REST endpoint.
pub struct AzureSpeech {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    voice: String,
}

const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";
const REQUEST_TIMEOUT_SECS: u64 = 60;

impl AzureSpeech {
    /// Build a client for the given regional endpoint and voice.
    ///
    /// `endpoint` is e.g. `https://eastasia.tts.speech.microsoft.com`; use
    /// [`AzureSpeech::regional_endpoint`] to derive it from a region name.
    pub fn new(endpoint: String, api_key: String, voice: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            voice,
        }
    }

    /// Default TTS endpoint for an Azure region.
    pub fn regional_endpoint(region: &str) -> String {
        format!("https://{region}.tts.speech.microsoft.com")
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeech {
    /// Synthesize `text`, write the WAV into `scratch_dir`, and return the
    /// file path plus its `[sound:…]` tag.
    async fn synthesize(
        &self,
        text: &str,
        scratch_dir: &Path,
    ) -> Result<SynthesizedAudio, SpeechError> {
        log::debug!("Synthesizing text");

        let url = format!("{}/cognitiveservices/v1", self.endpoint);
        let ssml = format!(
            "<speak version='1.0' xml:lang='zh-TW'><voice name='{}'>{}</voice></speak>",
            self.voice,
            escape_xml(text)
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", "mandarin-cards")
            .body(ssml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }

        let audio = response.bytes().await?;

        let file_name = format!("{}.wav", slugify(text));
        let path = scratch_dir.join(&file_name);
        std::fs::write(&path, &audio)?;

        log::debug!("Synthesized successfully, written to file {}", path.display());
        Ok(SynthesizedAudio {
            path,
            sound_tag: format!("[sound:{file_name}]"),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Filesystem-safe file stem: NFKC normalise, lowercase, drop everything but
/// word characters / whitespace / dashes, collapse separators to `-`.
fn slugify(text: &str) -> String {
    let normalised: String = text.nfkc().collect::<String>().to_lowercase();

    let mut slug = String::new();
    let mut pending_dash = false;
    for c in normalised.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = !slug.is_empty();
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(c);
        }
        // everything else is dropped
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_').to_string();
    if slug.is_empty() {
        "audio".to_string()
    } else {
        slug
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_keeps_hanzi() {
        assert_eq!(slugify("你好"), "你好");
        assert_eq!(slugify("你會講中文嗎?"), "你會講中文嗎");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("hello   world"), "hello-world");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("  spaced  "), "spaced");
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(slugify("ma?!"), "ma");
        assert_eq!(slugify("。，！"), "audio");
    }

    #[test]
    fn regional_endpoint_shape() {
        assert_eq!(
            AzureSpeech::regional_endpoint("eastasia"),
            "https://eastasia.tts.speech.microsoft.com"
        );
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("a<b&c>d"), "a&lt;b&amp;c&gt;d");
    }
}
