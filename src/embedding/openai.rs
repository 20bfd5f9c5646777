//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::{EmbeddingSettings, LlmSettings};
use crate::error::{PlotRagError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Maximum number of inputs sent in one embeddings request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings, using the configured endpoint and key.
    pub fn from_settings(embedding: &EmbeddingSettings, llm: &LlmSettings) -> Result<Self> {
        Ok(Self::with_client(
            create_client(llm)?,
            &embedding.model,
            embedding.dimensions as usize,
        ))
    }

    /// Create an embedder around an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, dimensions: usize) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| PlotRagError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            // The API rejects empty strings, and degenerate chunks are empty.
            let input: Vec<String> = batch
                .iter()
                .map(|t| if t.is_empty() { " ".to_string() } else { t.clone() })
                .collect();

            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(input))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| PlotRagError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| PlotRagError::OpenAI(format!("Embedding API error: {}", e)))?;

            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            if embeddings.len() != batch.len() {
                return Err(PlotRagError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
