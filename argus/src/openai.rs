use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};

use crate::config::OpenAiConfig;

/// Low sampling temperature; summaries should stay close to the retrieved
/// documents rather than get creative.
const TEMPERATURE: f32 = 0.2;

/// Client for the hosted chat model that writes summaries.
pub struct OpenAI {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAI {
    #[must_use]
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(config.api_key.clone())),
            model: config.chat_model.clone(),
        }
    }

    /// Invokes the chat model once and returns its text verbatim. No
    /// retries, no streaming, and no validation of what comes back; a
    /// failure is the caller's to report.
    ///
    /// # Errors
    ///
    /// This function will return an error if the completions API errors or
    /// returns no message content.
    pub async fn summarize(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .temperature(TEMPERATURE)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Could not find completion"))
    }
}
