//! Gemini client for generated error messages
//!
//! Talks to Gemini through its OpenAI-compatible endpoint. Used only to
//! phrase the fallback error message for failures the classifier cannot
//! name; everything else uses the fixed message table.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use anyhow::{anyhow, Result};

use crate::config::ERROR_MODEL;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Client for the Gemini chat-completion API
pub struct GeminiClient {
    client: Client<OpenAIConfig>,
}

impl GeminiClient {
    /// Create a client authenticated with `api_key`.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(GEMINI_API_BASE);
        Self {
            client: Client::with_config(config),
        }
    }

    /// Ask the model for a short error message built from the raw failure
    /// detail of a media resolution attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the model answers with an
    /// empty choice list. Callers fall back to a static message.
    pub async fn error_message(&self, detail: &str, chat_id: i64) -> Result<String> {
        let prompt = format!(
            "Generate a custom error message for an Instagram link error. \
             The error details are as follows:\nError: {detail}. \
             Please provide a personalized response for user ID: {chat_id}."
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(ERROR_MODEL)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .max_tokens(256u32)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!("empty completion response"))
    }
}
