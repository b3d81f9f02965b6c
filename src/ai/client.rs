//! Oracle client: one prompt in, one candidate command out.
//!
//! The oracle is Gemini, reached through its OpenAI-compatible chat
//! completions endpoint so the request plumbing stays on async-openai.
//! Inference is the single network suspension point in the program; there
//! is no timeout, a hung call blocks the loop.

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use thiserror::Error;
use tracing::debug;

use super::prompt;

/// Gemini's OpenAI-compatible API surface.
const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Cap on surfaced unknown-error text so oracle internals never flood the
/// terminal.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum OracleError {
    /// Configuration problem: the user has to run the setup flow, retrying
    /// will not help.
    #[error("no API key configured - run !api to set one up")]
    MissingKey,
    /// Transient: worth retrying manually after a pause.
    #[error("rate limit hit - wait a moment and try again")]
    RateLimited,
    /// Anything else, already truncated for display.
    #[error("{0}")]
    Other(String),
}

pub struct OracleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OracleClient {
    pub fn new(api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(GEMINI_OPENAI_BASE);
        Self {
            client: Client::with_config(config),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Resolve a natural-language request into a single command candidate.
    ///
    /// `history` is the formatted transcript from the context buffer; it and
    /// `cwd` are embedded verbatim in the prompt.
    pub async fn infer(
        &self,
        user_text: &str,
        cwd: &str,
        history: &str,
    ) -> Result<String, OracleError> {
        let content = prompt::build_prompt(user_text, cwd, history);
        debug!(chars = content.len(), "sending oracle prompt");

        let user_msg: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| classify_failure(&e.to_string()))?
            .into();
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![user_msg])
            .build()
            .map_err(|e| classify_failure(&e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| OracleError::Other("oracle returned an empty completion".to_string()))
    }
}

/// Sort a failure message into the error taxonomy. Rate limiting is
/// recognized by its usual markers; everything else is surfaced truncated.
fn classify_failure(message: &str) -> OracleError {
    let lower = message.to_lowercase();
    if message.contains("429") || lower.contains("quota") || lower.contains("rate limit") {
        return OracleError::RateLimited;
    }
    OracleError::Other(message.chars().take(MAX_ERROR_CHARS).collect())
}
