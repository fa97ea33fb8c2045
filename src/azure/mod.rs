//! Azure service clients.
//!
//! * [`Translator`] / [`AzureTranslator`] — translation and transliteration
//!   (Translator v3.0 REST API).
//! * [`SpeechSynthesizer`] / [`AzureSpeech`] — text-to-speech synthesis into
//!   scratch WAV files.

pub mod speech;
pub mod translator;

pub use speech::{AzureSpeech, SpeechError, SpeechSynthesizer, SynthesizedAudio};
pub use translator::{AzureTranslator, Translator, TranslatorError};
