//! Related-word generation for word cards.
//!
//! Asks the chat service for five words related to the card's word, parses
//! the CSV reply, and renders it as the `Similar Words` field.  The whole
//! call is wrapped in the shared retry policy; when every attempt fails the
//! card gets the sentinel value instead of aborting the run.

use std::sync::Arc;

use crate::config::{ReadingFormat, Script};

use super::client::{retry_class, ChatClient, ChatError, MAX_ATTEMPTS};
use super::reply::parse_reply_rows;
use super::retry::{retry_with, RetryError};

/// Placeholder emitted when the service never produced a usable reply.
pub const NO_RESULT: &str = "-";

const SYSTEM_PROMPT: &str =
    "You are a Taiwanese Mandarin Study Assistant generating study material";

/// Generates the related-word list for one word.
pub struct RelatedWords {
    client: Arc<dyn ChatClient>,
    script: Script,
    reading_format: ReadingFormat,
}

impl RelatedWords {
    pub fn new(client: Arc<dyn ChatClient>, script: Script, reading_format: ReadingFormat) -> Self {
        Self {
            client,
            script,
            reading_format,
        }
    }

    /// Produce the `Similar Words` field content for `word`.
    ///
    /// Reply rows join with `<br>` for card rendering.  Exhausted retries
    /// yield [`NO_RESULT`]; a fatal error propagates.
    pub async fn generate(&self, word: &str) -> Result<String, ChatError> {
        log::debug!("Generating similar words for {word}");

        let user = format!(
            "Generate 5 words closely related to \"\"\"{word}\"\"\" which are used commonly \
             in Taiwanese Mandarin.\nYou should provide the words in {}, the readings in \
             Pinyin, and the English Translation, all in CSV format.",
            self.script.prompt_name()
        );

        let outcome = retry_with(MAX_ATTEMPTS, retry_class, || {
            self.client.complete(SYSTEM_PROMPT, &user)
        })
        .await;

        match outcome {
            Ok(message) => {
                let rows = parse_reply_rows(&message, b',', self.reading_format, ", ");
                let joined = rows.join("<br>");
                log::debug!("Similar words generated: {joined}");
                Ok(joined)
            }
            Err(RetryError::Exhausted(e)) => {
                log::warn!("retried unsuccessfully {MAX_ATTEMPTS} times ({e}), giving up and returning {NO_RESULT}");
                Ok(NO_RESULT.to_string())
            }
            Err(RetryError::Fatal(e)) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Fails with `Request` errors until `succeed_on`, then replies.
    struct FlakyClient {
        calls: AtomicU32,
        succeed_on: u32,
        reply: String,
    }

    impl FlakyClient {
        fn new(succeed_on: u32, reply: &str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                succeed_on,
                reply: reply.to_string(),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatClient for FlakyClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ChatError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.succeed_on {
                Ok(self.reply.clone())
            } else {
                Err(ChatError::Request("connection reset".into()))
            }
        }
    }

    /// Always rate limited.
    struct RateLimitedClient(AtomicU32);

    #[async_trait]
    impl ChatClient for RateLimitedClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ChatError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ChatError::RateLimited)
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reply_rows_become_br_joined_field() {
        let client = Arc::new(FlakyClient::new(1, "可能,kě néng,possible\n以下,yǐ xià,below"));
        let gen = RelatedWords::new(client.clone(), Script::Traditional, ReadingFormat::Pinyin);

        let field = gen.generate("可以").await.unwrap();
        assert_eq!(field, "可能, kě néng, possible<br>以下, yǐ xià, below");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn always_failing_client_is_called_three_times_then_sentinel() {
        let client = Arc::new(FlakyClient::new(u32::MAX, ""));
        let gen = RelatedWords::new(client.clone(), Script::Simplified, ReadingFormat::Pinyin);

        let field = gen.generate("你好").await.unwrap();
        assert_eq!(field, NO_RESULT);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn second_attempt_success_is_used() {
        let client = Arc::new(FlakyClient::new(2, "可能,kě néng,possible"));
        let gen = RelatedWords::new(client.clone(), Script::Traditional, ReadingFormat::Pinyin);

        let field = gen.generate("可以").await.unwrap();
        assert_eq!(field, "可能, kě néng, possible");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_client_exhausts_with_cooldowns() {
        let client = Arc::new(RateLimitedClient(AtomicU32::new(0)));
        let gen = RelatedWords::new(client.clone(), Script::Simplified, ReadingFormat::Pinyin);

        let field = gen.generate("你好").await.unwrap();
        assert_eq!(field, NO_RESULT);
        assert_eq!(client.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn malformed_rows_are_dropped_not_retried() {
        let client = Arc::new(FlakyClient::new(1, "not,a,valid,row\njunk line"));
        let gen = RelatedWords::new(client.clone(), Script::Simplified, ReadingFormat::Pinyin);

        let field = gen.generate("你好").await.unwrap();
        assert_eq!(field, "");
        assert_eq!(client.calls(), 1);
    }
}
