//! Text generation by a language model.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for generative language models.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a single prompt and return the raw model text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model behind this generator.
    fn model(&self) -> &str;
}
