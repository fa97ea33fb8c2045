//! Flashcard deck assembly.
//!
//! * [`models`] — the word/sentence note models and card templates.
//! * [`DeckBuilder`] — note accumulation and `.apkg` packaging.

pub mod builder;
pub mod models;

pub use builder::{DeckBuilder, DeckError, SentenceCard, WordCard};
