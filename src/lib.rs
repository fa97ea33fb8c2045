//! Mandarin flashcard generator.
//!
//! Turns a CSV list of Mandarin words and sentences into an Anki `.apkg`
//! package with English glosses, phonetic readings (pinyin or zhuyin),
//! synthesized audio and optional chat-generated related words.

pub mod azure;
pub mod chat;
pub mod cli;
pub mod config;
pub mod deck;
pub mod mandarin;
pub mod pipeline;
