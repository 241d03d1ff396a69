//! Text summarization with fail-open semantics
//!
//! Long text is split into bounded chunks, each chunk is summarized as
//! bullet points by the language model, and the chunk summaries are joined
//! with newlines. If anything fails for any chunk, the caller gets the
//! original text back unchanged; summarization must never lose content or
//! block persistence.

mod client;

pub use client::{LlmClient, LlmError};

use crate::config::LlmConfig;
use tracing::error;

/// Chunked, fail-open summarization over a chat-completions client
pub struct Summarizer {
    client: LlmClient,
    model: String,
    max_chunk_chars: usize,
}

impl Summarizer {
    pub fn new(client: LlmClient, model: impl Into<String>, max_chunk_chars: usize) -> Self {
        Self {
            client,
            model: model.into(),
            max_chunk_chars,
        }
    }

    /// Builds a summarizer from configuration
    ///
    /// The API key comes from the config or falls back to `OPENAI_API_KEY`;
    /// a missing key is a configuration error raised before any crawl work.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = match &config.api_key {
            Some(key) => LlmClient::new(key.clone()),
            None => LlmClient::from_env().map_err(|_| {
                LlmError::Config(
                    "no API key: set llm.api-key in the config or OPENAI_API_KEY".into(),
                )
            })?,
        };

        let client = match &config.base_url {
            Some(base) => client.with_base_url(base.clone()),
            None => client,
        };

        Ok(Self::new(client, config.model.clone(), config.max_chunk_chars))
    }

    /// Summarizes text, returning the original input on any failure
    pub async fn summarize(&self, text: &str) -> String {
        match self.try_summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("summarization failed, keeping original text: {e}");
                text.to_string()
            }
        }
    }

    async fn try_summarize(&self, text: &str) -> Result<String, LlmError> {
        let mut summary = String::new();

        for chunk in chunk_text(text, self.max_chunk_chars) {
            let prompt = format!("Summarize this text in bullet points:\n{chunk}");
            let piece = self.client.chat_completion(&self.model, &prompt).await?;
            summary.push_str(&piece);
            summary.push('\n');
        }

        Ok(summary.trim().to_string())
    }
}

/// Splits text into chunks of at most `max_chars` characters
///
/// Splits are made on character boundaries, never inside a code point.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(split);
        chunks.push(head);
        rest = tail;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_respects_bound() {
        let chunks = chunk_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunk_text_exact_multiple() {
        let chunks = chunk_text("abcdefgh", 4);
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_chunk_text_short_input_single_chunk() {
        assert_eq!(chunk_text("abc", 2000), vec!["abc"]);
    }

    #[test]
    fn test_chunk_text_empty_input() {
        assert!(chunk_text("", 2000).is_empty());
    }

    #[test]
    fn test_chunk_text_multibyte_boundaries() {
        // Each of these is a multi-byte code point; a byte-based split
        // would panic or corrupt.
        let text = "héllö wörld çömpletely ünicode";
        let chunks = chunk_text(text, 5);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_chunk_text_zero_bound_does_not_loop() {
        let chunks = chunk_text("ab", 0);
        assert_eq!(chunks, vec!["a", "b"]);
    }
}
