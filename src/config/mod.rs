//! Configuration module for plotrag.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    ChunkingSettings, DatasetSettings, EmbeddingSettings, GeneralSettings, LlmSettings,
    PromptSettings, RetrievalSettings, Settings, VectorStoreSettings,
};
