//! Application entry point — Mandarin flashcard generator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (stdout at INFO, `log.txt` at DEBUG, `errlog.txt`
//!    at ERROR).
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Prompt interactively for any missing values and persist the result.
//! 4. Generate missing deck/model identifiers and persist them.
//! 5. Build the Azure translator/speech clients (and the chat client when
//!    enabled) from config.
//! 6. Run the requested subcommand on the tokio runtime.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

use mandarin_cards::{
    azure::{AzureSpeech, AzureTranslator, SpeechSynthesizer, Translator},
    chat::{ApiChatClient, ChatClient, ExampleSentences, RelatedWords},
    cli::{Cli, Command},
    config::{interactive, AppConfig, AppPaths},
    mandarin::Segmenter,
    pipeline::{collect_single_words, CardsPipeline, DeckIds},
};

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

const LOG_FILE: &str = "log.txt";
const ERROR_LOG_FILE: &str = "errlog.txt";

fn init_logging() -> anyhow::Result<()> {
    let config = ConfigBuilder::new().build();
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            config.clone(),
            TerminalMode::Stdout,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            config.clone(),
            File::create(LOG_FILE).context("failed to create log.txt")?,
        ),
        WriteLogger::new(
            LevelFilter::Error,
            config,
            File::create(ERROR_LOG_FILE).context("failed to create errlog.txt")?,
        ),
    ])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Load the configuration, prompt for anything missing, generate missing
/// deck/model ids and persist the result.
fn prepare_config(override_path: Option<&Path>) -> anyhow::Result<(AppConfig, PathBuf)> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => AppPaths::new().settings_file,
    };

    let mut config = AppConfig::load_from(&path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;

    let changed = interactive::complete(&mut config).context("interactive setup failed")?;
    if changed {
        config
            .save_to(&path)
            .with_context(|| format!("failed to save settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
    }

    Ok((config, path))
}

fn deck_ids(config: &AppConfig) -> anyhow::Result<DeckIds> {
    Ok(DeckIds {
        deck: config.model.deck_id.ok_or_else(|| anyhow!("missing deck id"))?,
        word_model: config
            .model
            .word_model_id
            .ok_or_else(|| anyhow!("missing word model id"))?,
        sentence_model: config
            .model
            .sentence_model_id
            .ok_or_else(|| anyhow!("missing sentence model id"))?,
    })
}

// ---------------------------------------------------------------------------
// Service construction
// ---------------------------------------------------------------------------

fn build_translator(config: &AppConfig) -> anyhow::Result<Arc<dyn Translator>> {
    let azure = &config.azure;
    let endpoint = azure
        .translator_endpoint
        .clone()
        .ok_or_else(|| anyhow!("azure.translator_endpoint is not configured"))?;
    let api_key = azure
        .translator_api_key
        .clone()
        .ok_or_else(|| anyhow!("azure.translator_api_key is not configured"))?;
    let region = azure
        .region
        .clone()
        .ok_or_else(|| anyhow!("azure.region is not configured"))?;
    Ok(Arc::new(AzureTranslator::new(
        endpoint,
        api_key,
        region,
        config.mandarin.script,
    )))
}

fn build_speech(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechSynthesizer>> {
    let azure = &config.azure;
    let api_key = azure
        .speech_api_key
        .clone()
        .ok_or_else(|| anyhow!("azure.speech_api_key is not configured"))?;
    let endpoint = match &azure.speech_endpoint {
        Some(endpoint) => endpoint.clone(),
        None => {
            let region = azure
                .region
                .clone()
                .ok_or_else(|| anyhow!("azure.region is not configured"))?;
            AzureSpeech::regional_endpoint(&region)
        }
    };
    Ok(Arc::new(AzureSpeech::new(
        endpoint,
        api_key,
        azure.speech_voice.clone(),
    )))
}

fn build_chat_client(config: &AppConfig) -> Option<Arc<dyn ChatClient>> {
    if !config.openai.enabled {
        return None;
    }
    Some(Arc::new(ApiChatClient::from_config(&config.openai)))
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let (config, _path) = prepare_config(cli.config.as_deref())?;

    match cli.command {
        Command::Cards { input, output } => {
            let translator = build_translator(&config)?;
            let speech = build_speech(&config)?;
            let related = build_chat_client(&config).map(|client| {
                RelatedWords::new(
                    client,
                    config.mandarin.script,
                    config.mandarin.reading_format,
                )
            });
            if related.is_none() {
                log::info!("Chat completions disabled; related words will be skipped");
            }

            let pipeline = CardsPipeline::new(
                translator,
                speech,
                related,
                config.mandarin.reading_format,
                deck_ids(&config)?,
            );
            pipeline
                .run(&input, &output)
                .await
                .with_context(|| format!("card generation from {} failed", input.display()))?;
        }

        Command::Sentences { input, output } => {
            let client = build_chat_client(&config)
                .ok_or_else(|| anyhow!("the sentences command requires openai.enabled = true"))?;
            let generator = ExampleSentences::new(
                client,
                config.mandarin.script,
                config.mandarin.reading_format,
            );

            let words = collect_single_words(&input, &Segmenter::new())?;
            if words.is_empty() {
                log::warn!("No single-word rows found in {}", input.display());
                return Ok(());
            }

            let csv_out = generator.generate(&words).await?;
            std::fs::write(&output, format!("{csv_out}\n"))
                .with_context(|| format!("failed to write {}", output.display()))?;
            log::info!(
                "Wrote example sentences for {} words to {}",
                words.len(),
                output.display()
            );
        }
    }

    Ok(())
}
