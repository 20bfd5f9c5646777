//! Pipeline orchestrator for plotrag.
//!
//! Builds the collaborators once at startup and hands them to the ingestion
//! and query pipelines.

use crate::chunking::ChunkingConfig;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::generation::{Generator, OpenAIGenerator};
use crate::ingest::{IngestReport, Ingestor};
use crate::rag::{Answer, RagEngine, Retriever};
use crate::vector_store::{Collection, SqliteVectorStore, VectorStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the plotrag pipelines.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create an orchestrator backed by the OpenAI embedder and the SQLite store.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding, &settings.llm)?);
        info!(
            "Using embedding model {} ({} dimensions)",
            settings.embedding.model, settings.embedding.dimensions
        );

        let vector_store = Arc::new(SqliteVectorStore::open(
            &settings.store_db_path(),
            &settings.vector_store.collection,
        )?);

        Ok(Self::with_components(settings, prompts, embedder, vector_store))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            vector_store,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configured collection, embedding on write and on query.
    pub fn collection(&self) -> Collection {
        Collection::new(self.vector_store.clone(), self.embedder.clone())
    }

    /// An ingestor using the configured chunk size.
    pub fn ingestor(&self) -> Ingestor {
        Ingestor::new(
            self.collection(),
            ChunkingConfig {
                max_words: self.settings.chunking.max_words,
            },
        )
    }

    /// A retriever over the configured collection.
    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.collection())
    }

    /// A RAG engine answering with the given generator.
    pub fn rag_engine(&self, generator: Arc<dyn Generator>) -> RagEngine {
        RagEngine::new(self.retriever(), generator).with_prompts(self.prompts.clone())
    }

    /// The configured chat model, optionally under another model name.
    pub fn default_generator(&self, model: Option<&str>) -> Result<Arc<dyn Generator>> {
        let mut generator = OpenAIGenerator::from_settings(&self.settings.llm)?;
        if let Some(model) = model {
            generator = generator.with_model(model);
        }
        Ok(Arc::new(generator))
    }

    /// Ingest the dataset sample into the collection.
    ///
    /// `dataset` and `limit` override the configured path and sample size.
    #[instrument(skip(self))]
    pub async fn ingest(
        &self,
        dataset: Option<PathBuf>,
        limit: Option<usize>,
        reset: bool,
    ) -> Result<IngestReport> {
        let path = dataset.unwrap_or_else(|| self.settings.dataset_path());
        let mut dataset_settings = self.settings.dataset.clone();
        if let Some(limit) = limit {
            dataset_settings.sample_size = limit;
        }

        self.ingestor().ingest_file(&path, &dataset_settings, reset).await
    }

    /// Answer a question with the given generator.
    pub async fn answer(
        &self,
        generator: Arc<dyn Generator>,
        question: &str,
        top_k: usize,
    ) -> Result<Answer> {
        self.rag_engine(generator).ask(question, top_k).await
    }
}
