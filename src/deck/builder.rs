//! Deck assembly and `.apkg` packaging on top of `genanki-rs`.

use std::path::{Path, PathBuf};

use genanki_rs::{Deck, Model, Note, Package};
use thiserror::Error;

use super::models;

// ---------------------------------------------------------------------------
// DeckError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DeckError {
    /// Note construction or package writing failed inside genanki.
    #[error("flashcard package error: {0}")]
    Package(String),
}

impl From<genanki_rs::Error> for DeckError {
    fn from(e: genanki_rs::Error) -> Self {
        DeckError::Package(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Card field structs
// ---------------------------------------------------------------------------

/// Field values for one word card.
#[derive(Debug, Clone)]
pub struct WordCard {
    pub hanzi: String,
    pub definition: String,
    pub audio_tag: String,
    pub reading: String,
    pub similar_words: String,
}

/// Field values for one sentence card.
#[derive(Debug, Clone)]
pub struct SentenceCard {
    pub hanzi: String,
    pub meaning: String,
    pub audio_tag: String,
    pub reading: String,
}

// ---------------------------------------------------------------------------
// DeckBuilder
// ---------------------------------------------------------------------------

/// Accumulates notes and media files, then writes the `.apkg` package.
///
/// The ids come from the persisted configuration, so re-running the tool
/// produces a package Anki merges into the existing deck.
pub struct DeckBuilder {
    deck: Deck,
    word_model: Model,
    sentence_model: Model,
    media: Vec<PathBuf>,
}

impl DeckBuilder {
    pub fn new(deck_id: i64, word_model_id: i64, sentence_model_id: i64) -> Self {
        Self {
            deck: Deck::new(deck_id, models::DECK_NAME, "Generated Mandarin flashcards"),
            word_model: models::word_model(word_model_id),
            sentence_model: models::sentence_model(sentence_model_id),
            media: Vec::new(),
        }
    }

    /// Append one word note.
    pub fn add_word(&mut self, card: &WordCard) -> Result<(), DeckError> {
        let timestamp = now_timestamp();
        let note = Note::new(
            self.word_model.clone(),
            vec![
                &timestamp,
                &card.hanzi,
                &card.definition,
                &card.audio_tag,
                &card.reading,
                &card.similar_words,
            ],
        )?;
        self.deck.add_note(note);
        Ok(())
    }

    /// Append one sentence note.
    pub fn add_sentence(&mut self, card: &SentenceCard) -> Result<(), DeckError> {
        let timestamp = now_timestamp();
        let note = Note::new(
            self.sentence_model.clone(),
            vec![
                &timestamp,
                &card.hanzi,
                &card.meaning,
                &card.audio_tag,
                &card.reading,
            ],
        )?;
        self.deck.add_note(note);
        Ok(())
    }

    /// Register a media file to bundle alongside the notes.
    pub fn add_media(&mut self, path: PathBuf) {
        self.media.push(path);
    }

    /// Write the `.apkg` package with all accumulated notes and media.
    pub fn write_package(self, output: &Path) -> Result<(), DeckError> {
        let media: Vec<String> = self
            .media
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let media_refs: Vec<&str> = media.iter().map(String::as_str).collect();

        let mut package = Package::new(vec![self.deck], media_refs)?;
        package.write_to_file(&output.to_string_lossy())?;
        Ok(())
    }
}

/// Nanoseconds since the Unix epoch, as the stringly timestamp field the
/// card templates expect.
fn now_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
