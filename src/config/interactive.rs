//! First-run completion of the configuration via stdin prompts.
//!
//! Each missing credential prints a pointer to
//! the relevant service documentation and reads one line from stdin.  Deck
//! and note-model ids are generated silently.  Nothing here is treated as an
//! error — a missing value is simply a value that has not been entered yet.

use std::io::{self, BufRead, Write};

use super::AppConfig;

const TRANSLATOR_DOCS: &str =
    "https://learn.microsoft.com/en-us/azure/cognitive-services/translator/text-sdk-overview";
const SPEECH_DOCS: &str =
    "https://learn.microsoft.com/en-GB/azure/cognitive-services/speech-service/get-started-text-to-speech";
const OPENAI_DOCS: &str = "https://platform.openai.com/docs/api-reference/authentication";

/// Fill in generated ids and prompt for any missing credentials.
///
/// Returns `true` when the config was modified and should be saved back.
/// Configs with no missing values never touch stdin.
pub fn complete(config: &mut AppConfig) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    complete_with(config, &mut input)
}

/// Same as [`complete`] but reads from an explicit `BufRead` (for tests).
pub fn complete_with<R: BufRead>(config: &mut AppConfig, input: &mut R) -> io::Result<bool> {
    let mut changed = config.model.ensure_ids();

    if config.azure.translator_api_key.is_none() {
        println!("Missing Microsoft Azure Translator config. See here: {TRANSLATOR_DOCS}");
        config.azure.translator_api_key = Some(prompt("Translator API Key", input)?);
        changed = true;
    }
    if config.azure.translator_endpoint.is_none() {
        println!("Missing Microsoft Azure Translator config. See here: {TRANSLATOR_DOCS}");
        config.azure.translator_endpoint = Some(prompt("Translator API Endpoint", input)?);
        changed = true;
    }
    if config.azure.speech_api_key.is_none() {
        println!("Missing Microsoft Azure Speech config. See here: {SPEECH_DOCS}");
        config.azure.speech_api_key = Some(prompt("Speech API Key", input)?);
        changed = true;
    }
    if config.azure.region.is_none() {
        println!("Missing Microsoft Azure config. See here: {TRANSLATOR_DOCS}");
        config.azure.region = Some(prompt("Azure Region", input)?);
        changed = true;
    }
    if config.openai.enabled && config.openai.api_key.is_none() {
        println!("Missing OpenAI config. See here: {OPENAI_DOCS}");
        config.openai.api_key = Some(prompt("OpenAI API Key", input)?);
        changed = true;
    }

    Ok(changed)
}

fn prompt<R: BufRead>(label: &str, input: &mut R) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
