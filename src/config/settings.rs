//! Configuration settings for plotrag.

use crate::error::{PlotRagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub dataset: DatasetSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Source dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to the CSV file with movie plots.
    pub path: String,
    /// Column holding the record title.
    pub title_column: String,
    /// Column holding the plot text.
    pub plot_column: String,
    /// Number of leading rows to ingest.
    pub sample_size: usize,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: "data/wiki_movie_plots_deduped.csv".to_string(),
            title_column: "Title".to_string(),
            plot_column: "Plot".to_string(),
            sample_size: 500,
        }
    }
}

/// Chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum number of words per chunk.
    pub max_words: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { max_words: 300 }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Directory holding the store database.
    pub path: String,
    /// Name of the collection chunks are written to.
    pub collection: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            path: "data/vector_store".to_string(),
            collection: "movie_plots".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model used to synthesize answers.
    pub model: String,
    /// Base URL of an OpenAI-compatible API. Uses the OpenAI default when unset.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Default number of chunks to retrieve per question.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_words == 0 {
            return Err(PlotRagError::Config("chunking.max_words must be at least 1".to_string()));
        }
        if self.dataset.sample_size == 0 {
            return Err(PlotRagError::Config("dataset.sample_size must be at least 1".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(PlotRagError::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.embedding.dimensions == 0 {
            return Err(PlotRagError::Config("embedding.dimensions must be at least 1".to_string()));
        }
        if self.vector_store.collection.trim().is_empty() {
            return Err(PlotRagError::Config("vector_store.collection must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PlotRagError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plotrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded dataset path.
    pub fn dataset_path(&self) -> PathBuf {
        Self::expand_path(&self.dataset.path)
    }

    /// Get the expanded SQLite database path inside the store directory.
    pub fn store_db_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.path).join("vectors.db")
    }
}
