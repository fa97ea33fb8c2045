//! Example-sentence generation (the `sentences` subcommand).
//!
//! Takes the single-word rows of the input CSV and asks the chat service for
//! two pipe-delimited example sentences per word, written back out as CSV.

use std::sync::Arc;

use crate::config::{ReadingFormat, Script};

use super::client::{retry_class, ChatClient, ChatError, MAX_ATTEMPTS};
use super::related::NO_RESULT;
use super::reply::parse_reply_rows;
use super::retry::{retry_with, RetryError};

const SYSTEM_PROMPT: &str =
    "You are a Taiwanese Mandarin Study Assistant generating example Mandarin sentences.";

/// Generates example-sentence CSV for a batch of words.
pub struct ExampleSentences {
    client: Arc<dyn ChatClient>,
    script: Script,
    reading_format: ReadingFormat,
}

impl ExampleSentences {
    pub fn new(client: Arc<dyn ChatClient>, script: Script, reading_format: ReadingFormat) -> Self {
        Self {
            client,
            script,
            reading_format,
        }
    }

    /// Produce CSV content (one sentence per line) for `words`.
    ///
    /// The model is told to delimit columns with `|` so sentence-internal
    /// commas survive; the output rows are plain comma-separated CSV.
    /// Exhausted retries yield [`NO_RESULT`]; a fatal error propagates.
    pub async fn generate(&self, words: &[String]) -> Result<String, ChatError> {
        let word_list = words.join(", ");
        log::debug!("Generating example sentences for: {word_list}");

        let user = format!(
            "Create two example sentences for each of the following Mandarin words.\n\
             CSV format with the following columns: {} Sentence, Pinyin Transliteration, \
             English Translation. Use the pipe(|) character as a delimiter.\n\
             Example row: 她給我很大的安慰.|tā gěi wǒ hěn dà de ān wèi.|She gave me great comfort.\n\
             Words: \"\"\"{}\"\"\"",
            self.script.prompt_name(),
            word_list
        );

        let outcome = retry_with(MAX_ATTEMPTS, retry_class, || {
            self.client.complete(SYSTEM_PROMPT, &user)
        })
        .await;

        match outcome {
            Ok(message) => {
                let rows = parse_reply_rows(&message, b'|', self.reading_format, ",");
                Ok(rows.join("\n"))
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

    struct CannedClient {
        calls: AtomicU32,
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(user.contains("pipe(|)"));
            match &self.reply {
                Ok(msg) => Ok(msg.clone()),
                Err(()) => Err(ChatError::Status(500)),
            }
        }
    }

    #[tokio::test]
    async fn pipe_rows_become_csv_lines() {
        let client = Arc::new(CannedClient {
            calls: AtomicU32::new(0),
            reply: Ok("她給我很大的安慰.|tā gěi wǒ hěn dà de ān wèi.|She gave me great comfort.\n\
                       我可以幫你.|wǒ kě yǐ bāng nǐ.|I can help you."
                .to_string()),
        });
        let gen = ExampleSentences::new(client.clone(), Script::Traditional, ReadingFormat::Pinyin);

        let csv_out = gen
            .generate(&["安慰".to_string(), "可以".to_string()])
            .await
            .unwrap();

        let lines: Vec<&str> = csv_out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "她給我很大的安慰.,tā gěi wǒ hěn dà de ān wèi.,She gave me great comfort."
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persistent_server_errors_yield_sentinel() {
        let client = Arc::new(CannedClient {
            calls: AtomicU32::new(0),
            reply: Err(()),
        });
        let gen = ExampleSentences::new(client.clone(), Script::Simplified, ReadingFormat::Pinyin);

        let csv_out = gen.generate(&["你好".to_string()]).await.unwrap();
        assert_eq!(csv_out, NO_RESULT);
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }
}
