//! Application settings structs, defaults and TOML persistence.
//!
//! Four sections: `[model]` holds the
//! persisted deck/model identifiers, `[azure]` the translation and speech
//! credentials, `[mandarin]` the orthography and reading notation, and
//! `[openai]` the chat-completion settings.  All structs implement
//! `Serialize`, `Deserialize`, `Default` and `Clone` so they can be
//! round-tripped through TOML files.

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Which logograph orthography the input uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Simplified,
    Traditional,
}

impl Default for Script {
    fn default() -> Self {
        Self::Simplified
    }
}

impl Script {
    /// BCP-47 language tag used by the Azure Translator API.
    pub fn language_tag(self) -> &'static str {
        match self {
            Script::Simplified => "zh-Hans",
            Script::Traditional => "zh-Hant",
        }
    }

    /// Script tag used by the Azure Translator API (`fromScript`).
    pub fn script_tag(self) -> &'static str {
        match self {
            Script::Simplified => "Hans",
            Script::Traditional => "Hant",
        }
    }

    /// Human-readable name used inside chat-completion prompts.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Script::Simplified => "Simplified Mandarin",
            Script::Traditional => "Traditional Mandarin",
        }
    }
}

// ---------------------------------------------------------------------------
// ReadingFormat
// ---------------------------------------------------------------------------

/// Which phonetic notation readings are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingFormat {
    Pinyin,
    Zhuyin,
}

impl Default for ReadingFormat {
    fn default() -> Self {
        Self::Pinyin
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Persisted deck and note-model identifiers.
///
/// Anki identifies decks and models by these integers, so they are generated
/// once and persisted — re-running the tool then updates the existing deck
/// instead of creating a duplicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub deck_id: Option<i64>,
    pub word_model_id: Option<i64>,
    pub sentence_model_id: Option<i64>,
}

/// Random id in `[2^30, 2^31)`, the range genanki reserves for user models.
pub fn generate_id() -> i64 {
    rand::thread_rng().gen_range(1_i64 << 30..1_i64 << 31)
}

impl ModelConfig {
    /// Fill in any missing identifiers. Returns `true` when one was generated.
    pub fn ensure_ids(&mut self) -> bool {
        let mut changed = false;
        for id in [
            &mut self.deck_id,
            &mut self.word_model_id,
            &mut self.sentence_model_id,
        ] {
            if id.is_none() {
                *id = Some(generate_id());
                changed = true;
            }
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// AzureConfig
// ---------------------------------------------------------------------------

/// Credentials and endpoints for the Azure Translator and Speech services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Translator resource key.
    pub translator_api_key: Option<String>,
    /// Translator endpoint, e.g. `https://api.cognitive.microsofttranslator.com`.
    pub translator_endpoint: Option<String>,
    /// Speech resource key.
    pub speech_api_key: Option<String>,
    /// Speech endpoint override — when `None` the regional endpoint
    /// `https://{region}.tts.speech.microsoft.com` is derived from `region`.
    pub speech_endpoint: Option<String>,
    /// Azure region (e.g. `eastasia`), sent with both services.
    pub region: Option<String>,
    /// Neural voice used for speech synthesis.
    pub speech_voice: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            translator_api_key: None,
            translator_endpoint: None,
            speech_api_key: None,
            speech_endpoint: None,
            region: None,
            speech_voice: "zh-TW-YunJheNeural".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// MandarinConfig
// ---------------------------------------------------------------------------

/// Orthography and reading-notation settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MandarinConfig {
    #[serde(default)]
    pub script: Script,
    #[serde(default)]
    pub reading_format: ReadingFormat,
}

// ---------------------------------------------------------------------------
// OpenAiConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completion service (related-word and
/// example-sentence generation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Whether chat-completion features are active at all.
    pub enabled: bool,
    /// API key — prompted for only when `enabled` is set.
    pub api_key: Option<String>,
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// Model identifier sent to the API.
    pub model: String,
    /// Maximum seconds to wait for a chat response before timing out.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://api.openai.com".into(),
            model: "gpt-3.5-turbo".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Loaded once at startup, completed interactively (see
/// [`interactive::complete`](super::interactive::complete)), saved back, and
/// from then on passed around as an immutable value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub mandarin: MandarinConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Names of the values that still have to be prompted for.
    ///
    /// Deck/model ids are not listed — they are generated, never prompted.
    /// OpenAI credentials only count when the feature is enabled.
    pub fn missing_values(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.azure.translator_api_key.is_none() {
            missing.push("azure.translator_api_key");
        }
        if self.azure.translator_endpoint.is_none() {
            missing.push("azure.translator_endpoint");
        }
        if self.azure.speech_api_key.is_none() {
            missing.push("azure.speech_api_key");
        }
        if self.azure.region.is_none() {
            missing.push("azure.region");
        }
        if self.openai.enabled && self.openai.api_key.is_none() {
            missing.push("openai.api_key");
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn complete_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.model.ensure_ids();
        cfg.azure.translator_api_key = Some("tkey".into());
        cfg.azure.translator_endpoint =
            Some("https://api.cognitive.microsofttranslator.com".into());
        cfg.azure.speech_api_key = Some("skey".into());
        cfg.azure.region = Some("eastasia".into());
        cfg
    }

    /// Verify that a completed config survives a save/load cycle without any
    /// data loss — the "no re-prompting on the second run" guarantee.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let mut original = complete_config();
        original.mandarin.script = Script::Traditional;
        original.mandarin.reading_format = ReadingFormat::Zhuyin;
        original.openai.enabled = true;
        original.openai.api_key = Some("sk-test".into());

        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.model.deck_id, original.model.deck_id);
        assert_eq!(loaded.model.word_model_id, original.model.word_model_id);
        assert_eq!(
            loaded.model.sentence_model_id,
            original.model.sentence_model_id
        );
        assert_eq!(
            loaded.azure.translator_api_key,
            original.azure.translator_api_key
        );
        assert_eq!(
            loaded.azure.translator_endpoint,
            original.azure.translator_endpoint
        );
        assert_eq!(loaded.azure.speech_api_key, original.azure.speech_api_key);
        assert_eq!(loaded.azure.region, original.azure.region);
        assert_eq!(loaded.azure.speech_voice, original.azure.speech_voice);
        assert_eq!(loaded.mandarin.script, Script::Traditional);
        assert_eq!(loaded.mandarin.reading_format, ReadingFormat::Zhuyin);
        assert_eq!(loaded.openai.api_key, Some("sk-test".into()));
        assert!(loaded.missing_values().is_empty());
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert!(config.model.deck_id.is_none());
        assert_eq!(config.mandarin.script, Script::Simplified);
        assert_eq!(config.mandarin.reading_format, ReadingFormat::Pinyin);
        assert!(!config.openai.enabled);
        assert_eq!(config.azure.speech_voice, "zh-TW-YunJheNeural");
    }

    #[test]
    fn generated_ids_are_in_genanki_range() {
        for _ in 0..100 {
            let id = generate_id();
            assert!(id >= 1 << 30);
            assert!(id < 1 << 31);
        }
    }

    #[test]
    fn ensure_ids_fills_only_missing() {
        let mut model = ModelConfig {
            deck_id: Some(42),
            ..ModelConfig::default()
        };
        assert!(model.ensure_ids());
        assert_eq!(model.deck_id, Some(42));
        assert!(model.word_model_id.is_some());
        assert!(model.sentence_model_id.is_some());

        // Second pass changes nothing.
        assert!(!model.ensure_ids());
    }

    /// A default config wants Azure credentials but no OpenAI key while the
    /// chat feature stays disabled.
    #[test]
    fn missing_values_respects_openai_toggle() {
        let mut cfg = AppConfig::default();
        assert!(cfg.missing_values().contains(&"azure.translator_api_key"));
        assert!(!cfg.missing_values().contains(&"openai.api_key"));

        cfg.openai.enabled = true;
        assert!(cfg.missing_values().contains(&"openai.api_key"));
    }

    /// A partial TOML file (single section) loads with defaults elsewhere.
    #[test]
    fn partial_file_loads_with_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[mandarin]\nreading_format = \"zhuyin\"\n").expect("write");

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.mandarin.reading_format, ReadingFormat::Zhuyin);
        assert_eq!(config.azure.speech_voice, "zh-TW-YunJheNeural");
        assert!(config.model.deck_id.is_none());
    }
}
