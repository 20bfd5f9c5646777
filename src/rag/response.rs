//! Grounded answer generation.

use super::context::{format_context_for_prompt, Retriever};
use super::structured::{recover, Recovery};
use super::ContextChunk;
use crate::config::Prompts;
use crate::error::Result;
use crate::generation::Generator;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A grounded answer with the chunks it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// The model's answer, or its raw reply when that was not valid JSON.
    pub answer: String,
    /// Retrieved chunk texts, in rank order.
    pub contexts: Vec<String>,
    /// The model's reasoning, or a diagnostic when parsing failed.
    pub reasoning: String,
}

impl Answer {
    /// Drop the retrieved contexts, for callers that did not ask to see them.
    pub fn without_contexts(mut self) -> Self {
        self.contexts.clear();
        self
    }
}

/// RAG engine for question answering.
pub struct RagEngine {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(retriever: Retriever, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Build the grounding prompt for a question and its assembled context.
    pub fn build_prompt(&self, question: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context.to_string());
        self.prompts.render_with_custom(&self.prompts.answer.user, &vars)
    }

    /// Retrieve context for a question and ask the model for a grounded answer.
    ///
    /// Model failures propagate; a malformed reply does not.
    #[instrument(skip(self), fields(question = %question, model = %self.generator.model()))]
    pub async fn ask(&self, question: &str, top_k: usize) -> Result<Answer> {
        info!("Processing question: {}", question);

        let chunks = self.retriever.retrieve(question, top_k).await?;
        if chunks.is_empty() {
            warn!("No chunks retrieved; the collection may be empty");
        }

        let prompt = self.build_prompt(question, &format_context_for_prompt(&chunks));
        let raw = self.generator.generate(&prompt).await?;

        let (structured, recovery) = recover(&raw);
        if recovery == Recovery::Fallback {
            warn!("Model reply was not valid JSON, returning raw text");
        }
        debug!("Answered with {} contexts", chunks.len());

        Ok(Answer {
            answer: structured.answer,
            contexts: chunks.into_iter().map(|c: ContextChunk| c.text).collect(),
            reasoning: structured.reasoning,
        })
    }
}
