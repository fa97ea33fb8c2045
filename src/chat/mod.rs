//! Chat-completion integration.
//!
//! * [`ChatClient`] — async trait implemented by all chat backends.
//! * [`ApiChatClient`] — OpenAI-compatible REST client.
//! * [`retry`] — shared bounded-retry policy with rate-limit cooldown.
//! * [`RelatedWords`] — `Similar Words` field generation for word cards.
//! * [`ExampleSentences`] — example-sentence CSV generation.

pub mod client;
pub mod related;
pub mod reply;
pub mod retry;
pub mod sentences;

pub use client::{retry_class, ApiChatClient, ChatClient, ChatError, MAX_ATTEMPTS};
pub use related::{RelatedWords, NO_RESULT};
pub use retry::{retry_with, RetryClass, RetryError};
pub use sentences::ExampleSentences;
