//! Card-generation pipeline — drives the full CSV → services → package run.
//!
//! # Pipeline flow
//!
//! ```text
//! input.csv row [text, gloss?]
//!   └─▶ Segmenter::is_single_word(text)
//!         ├─ word      → gloss | translate → synthesize → reading
//!         │             → related words (chat, optional)      [WordCard]
//!         └─ sentence  → extract stars → gloss | translate
//!                       → synthesize → transliterate
//!                       → annotate text + reading             [SentenceCard]
//!   └─▶ DeckBuilder::write_package(output.apkg)
//! ```
//!
//! Processing is deliberately sequential: every external call completes
//! before the next row starts, and no state is shared across rows.
//! Synthesized audio accumulates in a scratch directory that is removed when
//! the run finishes.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::azure::{SpeechError, SpeechSynthesizer, Translator, TranslatorError};
use crate::chat::{ChatError, RelatedWords, NO_RESULT};
use crate::config::ReadingFormat;
use crate::deck::{DeckBuilder, DeckError, SentenceCard, WordCard};
use crate::mandarin::{phonetics, star, Segmenter};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that abort the run.
///
/// Degraded paths (failed zhuyin conversion, unmatched highlight spans,
/// exhausted chat retries) are handled inside the components and never
/// surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read input CSV: {0}")]
    Input(#[from] csv::Error),

    #[error("failed to prepare scratch directory: {0}")]
    Scratch(std::io::Error),

    #[error(transparent)]
    Translator(#[from] TranslatorError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Row counts reported after a successful run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub words: usize,
    pub sentences: usize,
}

// ---------------------------------------------------------------------------
// Deck identifiers
// ---------------------------------------------------------------------------

/// The three persisted ids a run needs, resolved from config.
#[derive(Debug, Clone, Copy)]
pub struct DeckIds {
    pub deck: i64,
    pub word_model: i64,
    pub sentence_model: i64,
}

// ---------------------------------------------------------------------------
// CardsPipeline
// ---------------------------------------------------------------------------

/// Drives the complete card-generation run.
pub struct CardsPipeline {
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechSynthesizer>,
    related: Option<RelatedWords>,
    segmenter: Segmenter,
    reading_format: ReadingFormat,
    ids: DeckIds,
}

impl CardsPipeline {
    /// Create a new pipeline.
    ///
    /// `related` is `None` when the chat-completion feature is disabled —
    /// word cards then carry the sentinel value instead.
    pub fn new(
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSynthesizer>,
        related: Option<RelatedWords>,
        reading_format: ReadingFormat,
        ids: DeckIds,
    ) -> Self {
        Self {
            translator,
            speech,
            related,
            segmenter: Segmenter::new(),
            reading_format,
            ids,
        }
    }

    /// Process every row of `input` and write the package to `output`.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary, PipelineError> {
        let scratch = tempfile::tempdir().map_err(PipelineError::Scratch)?;
        let mut builder = DeckBuilder::new(self.ids.deck, self.ids.word_model, self.ids.sentence_model);
        let mut summary = RunSummary::default();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(input)?;

        for record in reader.records() {
            let record = record?;
            let Some(text) = record.get(0).filter(|t| !t.is_empty()) else {
                continue;
            };
            let gloss = record.get(1).filter(|g| !g.is_empty()).map(str::to_string);

            if self.segmenter.is_single_word(text) {
                log::info!("Found word: {text}");
                let card = self.build_word_card(text, gloss, scratch.path(), &mut builder).await?;
                builder.add_word(&card)?;
                summary.words += 1;
            } else {
                log::info!("Found sentence: {text}");
                let card = self
                    .build_sentence_card(text, gloss, scratch.path(), &mut builder)
                    .await?;
                builder.add_sentence(&card)?;
                summary.sentences += 1;
            }
        }

        builder.write_package(output)?;
        log::info!(
            "Wrote {} ({} words, {} sentences)",
            output.display(),
            summary.words,
            summary.sentences
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Row processing
    // -----------------------------------------------------------------------

    /// Assemble one word card.
    ///
    /// A supplied gloss skips the translation call; the reading then comes
    /// from the local pinyin data instead of the transliteration service.
    async fn build_word_card(
        &self,
        text: &str,
        gloss: Option<String>,
        scratch: &Path,
        builder: &mut DeckBuilder,
    ) -> Result<WordCard, PipelineError> {
        let (definition, pinyin_reading) = match gloss {
            Some(definition) => (definition, phonetics::local_reading(text)),
            None => (
                self.translator.translate(text).await?,
                self.translator.transliterate(text).await?,
            ),
        };

        let audio = self.speech.synthesize(text, scratch).await?;
        builder.add_media(audio.path);

        let reading = phonetics::render_reading(&pinyin_reading, self.reading_format);

        let similar_words = match &self.related {
            Some(related) => related.generate(text).await?,
            None => NO_RESULT.to_string(),
        };

        Ok(WordCard {
            hanzi: text.to_string(),
            definition,
            audio_tag: audio.sound_tag,
            reading,
            similar_words,
        })
    }

    /// Assemble one sentence card, applying star highlighting when the row
    /// carries `*` markers.
    async fn build_sentence_card(
        &self,
        text: &str,
        gloss: Option<String>,
        scratch: &Path,
        builder: &mut DeckBuilder,
    ) -> Result<SentenceCard, PipelineError> {
        let (clean, spans) = star::extract_starred(text);
        if !spans.is_empty() {
            log::debug!("Found and extracted starred words: {spans:?}");
        }

        let meaning = match gloss {
            Some(meaning) => meaning,
            None => self.translator.translate(&clean).await?,
        };

        let audio = self.speech.synthesize(&clean, scratch).await?;
        builder.add_media(audio.path);

        let pinyin_reading = self.translator.transliterate(&clean).await?;
        let mut reading = phonetics::render_reading(&pinyin_reading, self.reading_format);

        let hanzi = if spans.is_empty() {
            clean
        } else {
            reading = star::annotate_reading(&reading, &spans, self.reading_format);
            star::annotate_text(&clean, &spans)
        };

        Ok(SentenceCard {
            hanzi,
            meaning,
            audio_tag: audio.sound_tag,
            reading,
        })
    }
}

// ---------------------------------------------------------------------------
// Word collection (sentences subcommand)
// ---------------------------------------------------------------------------

/// Collect the single-word rows of `input`, in file order.
pub fn collect_single_words(
    input: &Path,
    segmenter: &Segmenter,
) -> Result<Vec<String>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(input)?;

    let mut words = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(text) = record.get(0).filter(|t| !t.is_empty()) {
            if segmenter.is_single_word(text) {
                words.push(text.to_string());
            }
        }
    }
    Ok(words)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
