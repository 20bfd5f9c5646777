//! OpenAI-compatible chat completion generator.

use super::Generator;
use crate::config::LlmSettings;
use crate::error::{PlotRagError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by the chat completions endpoint.
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIGenerator {
    /// Create a generator from settings, using the configured endpoint and key.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Ok(Self::with_client(
            create_client(settings)?,
            &settings.model,
            settings.temperature,
        ))
    }

    /// Create a generator around an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, temperature: f32) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    /// Override the model name.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PlotRagError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| PlotRagError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PlotRagError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PlotRagError::Generation("Empty response from model".to_string()))?;

        debug!("Model returned {} bytes", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
